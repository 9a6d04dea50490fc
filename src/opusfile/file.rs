//! In-memory Opus file reader.

use std::os::raw::c_int;
use std::ptr;

use thiserror::Error;

use super::ffi::{self, OggOpusFile as OggOpusFileHandle};

/// Opus file error.
#[derive(Debug, Error)]
pub enum FileError {
    /// `op_open_memory` rejected the buffer. Carries the native status code
    /// and its description.
    #[error("opusfile: open failed (code {code}): {message}")]
    OpenFailed { code: i32, message: &'static str },
    /// `op_read_stereo` returned a negative status.
    #[error("opusfile: read failed (code {code}): {message}")]
    ReadFailed { code: i32, message: &'static str },
}

impl FileError {
    /// The native opusfile status code, verbatim.
    pub fn code(&self) -> i32 {
        match self {
            Self::OpenFailed { code, .. } | Self::ReadFailed { code, .. } => *code,
        }
    }

    fn open(code: i32) -> Self {
        Self::OpenFailed {
            code,
            message: ffi::error_string(code),
        }
    }
}

/// A fully parsed in-memory Opus file ready for PCM extraction.
///
/// Wraps the opaque `OggOpusFile` handle. The native library keeps reading
/// from the source buffer for the handle's whole life, so the wrapper owns
/// the bytes alongside the handle and releases both together: `op_free`
/// runs exactly once, on drop.
#[derive(Debug)]
pub struct OpusFile {
    handle: *mut OggOpusFileHandle,
    // Backing buffer the handle reads from. Held, never touched from Rust.
    _data: Box<[u8]>,
}

// Safety: the handle is only touched through &mut self.
unsafe impl Send for OpusFile {}

impl Drop for OpusFile {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::op_free(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}

impl OpusFile {
    /// Parses a byte buffer as a complete Opus file.
    ///
    /// The native call signals failure twice, through a null handle and an
    /// out-parameter status code; both collapse into the single `Err` here.
    pub fn open_memory(data: impl Into<Vec<u8>>) -> Result<Self, FileError> {
        let data: Box<[u8]> = data.into().into_boxed_slice();
        let mut error: c_int = 0;
        let handle = unsafe { ffi::op_open_memory(data.as_ptr(), data.len(), &mut error) };

        if handle.is_null() {
            // A null handle with a zero code should not happen; report it as
            // the library's allocation failure rather than success.
            let code = if error != 0 { error } else { ffi::OP_EFAULT };
            return Err(FileError::open(code));
        }
        if error != 0 {
            unsafe { ffi::op_free(handle) };
            return Err(FileError::open(error));
        }

        Ok(Self {
            handle,
            _data: data,
        })
    }

    /// Decodes the next chunk of audio as interleaved 16-bit stereo PCM at
    /// 48 kHz into the caller's buffer.
    ///
    /// Returns the number of samples written per channel, or `Ok(0)` once
    /// the file is fully drained. Repeated calls are the only way to read
    /// the file; there is no seeking.
    pub fn read_stereo(&mut self, pcm: &mut [i16]) -> Result<usize, FileError> {
        let n = unsafe {
            ffi::op_read_stereo(self.handle, pcm.as_mut_ptr(), pcm.len() as c_int)
        };
        if n < 0 {
            return Err(FileError::ReadFailed {
                code: n,
                message: ffi::error_string(n),
            });
        }
        Ok(n as usize)
    }

    /// Drains the whole file into one interleaved stereo sample vector.
    pub fn read_all_stereo(&mut self) -> Result<Vec<i16>, FileError> {
        // 120ms of 48kHz stereo, the largest chunk op_read_stereo returns.
        let mut chunk = [0i16; 11520];
        let mut out = Vec::new();
        loop {
            let n = self.read_stereo(&mut chunk)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n * 2]);
        }
    }
}
