//! Core of a 16-bit LC-3 virtual machine: register file, memory, instruction
//! decoding, trap dispatch, and the fetch-decode-execute loop. `main.rs`
//! layers the command-line surface (image loading, terminal raw mode,
//! `Ctrl-C` handling) on top of this crate.

pub mod bits;
pub mod decode;
pub mod error;
pub mod loader;
pub mod selftest;
pub mod trap;
pub mod vm;
