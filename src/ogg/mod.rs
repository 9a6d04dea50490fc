//! Ogg container format (RFC 3533), via libogg.
//!
//! [`Stream`] wraps the native packetizer: packets in, pages out. The `ffi`
//! module carries the raw layout mirror for callers that need it.

pub mod ffi;
mod opus_writer;
mod packet;
mod stream;

pub use opus_writer::*;
pub use packet::*;
pub use stream::*;
