//! Error types for the VM core, loader, and trap dispatch.

use thiserror::Error;

/// Fatal errors raised while fetching, decoding or executing an instruction.
///
/// The LC-3 has no local recovery for these: any occurrence terminates the
/// fetch-execute loop. The caller decides whether that means a hard process
/// exit or a structured shutdown that first restores terminal state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    #[error("illegal opcode in instruction 0x{0:04x} (RTI or RES)")]
    IllegalOpcode(u16),
    #[error("illegal trap vector 0x{0:02x}")]
    IllegalTrap(u8),
}

/// Errors raised while loading a binary object image into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("image is shorter than the two-byte origin header")]
    ImageTruncated,
    #[error("I/O error while reading image: {0}")]
    Io(#[from] std::io::Error),
}
