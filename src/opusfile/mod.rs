//! Opus file decoding (RFC 7845), via libopusfile.

pub mod ffi;
mod file;

pub use file::*;
