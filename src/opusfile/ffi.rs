//! FFI bindings to libopusfile.

use std::os::raw::{c_int, c_uchar};

use crate::opus::ffi::OpusInt16;

/// Opaque parsed-Opus-file handle.
pub enum OggOpusFile {}

// Status codes (from opusfile.h)
pub const OP_FALSE: c_int = -1;
pub const OP_EOF: c_int = -2;
pub const OP_HOLE: c_int = -3;
pub const OP_EREAD: c_int = -128;
pub const OP_EFAULT: c_int = -129;
pub const OP_EIMPL: c_int = -130;
pub const OP_EINVAL: c_int = -131;
pub const OP_ENOTFORMAT: c_int = -132;
pub const OP_EBADHEADER: c_int = -133;
pub const OP_EVERSION: c_int = -134;
pub const OP_ENOTAUDIO: c_int = -135;
pub const OP_EBADPACKET: c_int = -136;
pub const OP_EBADLINK: c_int = -137;
pub const OP_ENOSEEK: c_int = -138;
pub const OP_EBADTIMESTAMP: c_int = -139;

unsafe extern "C" {
    pub fn op_open_memory(
        data: *const c_uchar,
        size: usize,
        error: *mut c_int,
    ) -> *mut OggOpusFile;

    pub fn op_free(of: *mut OggOpusFile);

    pub fn op_read_stereo(of: *mut OggOpusFile, pcm: *mut OpusInt16, buf_size: c_int) -> c_int;
}

/// Gets an error message for an opusfile status code.
pub fn error_string(error: c_int) -> &'static str {
    match error {
        OP_FALSE => "request did not succeed",
        OP_EOF => "end of file",
        OP_HOLE => "gap in the page sequence",
        OP_EREAD => "read operation failed",
        OP_EFAULT => "internal memory allocation failed",
        OP_EIMPL => "feature not implemented",
        OP_EINVAL => "invalid argument",
        OP_ENOTFORMAT => "not an Opus stream",
        OP_EBADHEADER => "malformed Opus header",
        OP_EVERSION => "unrecognized Opus version",
        OP_ENOTAUDIO => "packet is not an audio packet",
        OP_EBADPACKET => "malformed audio packet",
        OP_EBADLINK => "corrupt link in the stream",
        OP_ENOSEEK => "stream is not seekable",
        OP_EBADTIMESTAMP => "invalid timestamp",
        _ => "unknown opusfile error",
    }
}
