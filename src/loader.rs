//! Binary object-image loading.
//!
//! An object image is a big-endian stream of 16-bit words. The first word is
//! the *origin*, the address at which the remaining words are placed,
//! contiguously, in memory.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};

use crate::error::LoadError;
use crate::vm::memory::{KeySource, Memory};

/// Load one object image from `reader` into `memory`, returning the origin
/// address it was loaded at.
///
/// If the stream ends before the two-byte origin header is fully read,
/// returns [`LoadError::ImageTruncated`]. If the image is long enough that
/// loading its remaining words would run past address 0xffff, the excess is
/// silently dropped, matching the convention that an image's own length
/// (not an explicit word count) determines how much of it is loaded.
pub fn load_image<K: KeySource, R: Read>(
    memory: &mut Memory<K>,
    mut reader: R,
) -> Result<u16, LoadError> {
    let origin = match reader.read_u16::<BigEndian>() {
        Ok(origin) => origin,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(LoadError::ImageTruncated)
        }
        Err(e) => return Err(LoadError::Io(e)),
    };

    let mut addr = origin;
    loop {
        match reader.read_u16::<BigEndian>() {
            Ok(word) => {
                memory.write(addr, word);
                if addr == 0xffff {
                    break;
                }
                addr = addr.wrapping_add(1);
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(LoadError::Io(e)),
        }
    }

    Ok(origin)
}
