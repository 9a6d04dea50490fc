//! FFI bindings to libopus.

use std::os::raw::{c_char, c_int, c_uchar};

/// opus_int32 type (from opus_types.h)
pub type OpusInt32 = i32;

/// opus_int16 type (from opus_types.h)
pub type OpusInt16 = i16;

// Return codes
pub const OPUS_OK: c_int = 0;
pub const OPUS_BAD_ARG: c_int = -1;
pub const OPUS_INVALID_PACKET: c_int = -4;

unsafe extern "C" {
    pub fn opus_strerror(error: c_int) -> *const c_char;

    pub fn opus_packet_get_nb_samples(
        packet: *const c_uchar,
        len: OpusInt32,
        fs: OpusInt32,
    ) -> c_int;
}

/// Gets an error message for an opus error code.
pub fn error_string(error: c_int) -> String {
    unsafe {
        let c_str = opus_strerror(error);
        if c_str.is_null() {
            return format!("opus error {}", error);
        }
        std::ffi::CStr::from_ptr(c_str)
            .to_string_lossy()
            .into_owned()
    }
}
