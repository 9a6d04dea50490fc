//! Opus audio codec (RFC 6716), via libopus.
//!
//! Only packet introspection is bound here; decoding goes through the
//! `opusfile` module.

pub mod ffi;
mod packet;

pub use packet::*;
