//! FFI bindings to libogg.
//!
//! The structs here mirror libogg's own layouts field for field; any
//! reordering or width change corrupts memory across the FFI boundary
//! instead of failing detectably.

use std::os::raw::{c_int, c_long, c_uchar};

/// ogg_int64_t type (from ogg/os_types.h)
pub type OggInt64 = i64;

/// Mirror of `ogg_stream_state`.
///
/// Owned and mutated exclusively by libogg between `ogg_stream_init` and
/// `ogg_stream_clear`; Rust code only ever hands out a pointer to it.
/// `body_*` and `lacing_*` cursors satisfy `returned <= fill <= storage`,
/// enforced inside the library.
#[repr(C)]
pub struct OggStreamState {
    pub body_data: *mut c_uchar,
    pub body_storage: c_long,
    pub body_fill: c_long,
    pub body_returned: c_long,
    pub lacing_vals: *mut c_int,
    pub granule_vals: *mut OggInt64,
    pub lacing_storage: c_long,
    pub lacing_fill: c_long,
    pub lacing_packet: c_long,
    pub lacing_returned: c_long,
    pub header: [c_uchar; 282],
    pub header_fill: c_int,
    pub e_o_s: c_int,
    pub b_o_s: c_int,
    pub serialno: c_long,
    pub pageno: c_long,
    pub packetno: OggInt64,
    pub granulepos: OggInt64,
}

/// Mirror of `ogg_page`.
///
/// `header` and `body` point into memory owned by the associated stream
/// state and are invalidated by the next mutating call on that stream.
#[repr(C)]
pub struct OggPage {
    pub header: *mut c_uchar,
    pub header_len: c_long,
    pub body: *mut c_uchar,
    pub body_len: c_long,
}

/// Mirror of `ogg_packet`.
///
/// Caller-constructed; libogg reads it (and copies the body) during
/// `ogg_stream_packetin` but never frees it.
#[repr(C)]
pub struct OggPacket {
    pub packet: *mut c_uchar,
    pub bytes: c_long,
    pub b_o_s: c_long,
    pub e_o_s: c_long,
    pub granulepos: OggInt64,
    pub packetno: OggInt64,
}

unsafe extern "C" {
    pub fn ogg_stream_init(os: *mut OggStreamState, serialno: c_int) -> c_int;
    pub fn ogg_stream_clear(os: *mut OggStreamState) -> c_int;
    pub fn ogg_stream_reset(os: *mut OggStreamState) -> c_int;

    pub fn ogg_stream_packetin(os: *mut OggStreamState, op: *mut OggPacket) -> c_int;
    pub fn ogg_stream_pageout(os: *mut OggStreamState, og: *mut OggPage) -> c_int;
    pub fn ogg_stream_flush(os: *mut OggStreamState, og: *mut OggPage) -> c_int;
}
