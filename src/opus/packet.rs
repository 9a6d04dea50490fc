//! Opus packet introspection.

use std::ptr;

use thiserror::Error;

use super::ffi;

/// Opus packet error.
#[derive(Debug, Error)]
pub enum PacketError {
    /// libopus rejected the packet. Carries the native status code and its
    /// `opus_strerror` text.
    #[error("opus: invalid packet (code {code}): {message}")]
    Invalid { code: i32, message: String },
}

impl PacketError {
    /// The native libopus status code, verbatim.
    pub fn code(&self) -> i32 {
        match self {
            Self::Invalid { code, .. } => *code,
        }
    }
}

/// Returns the number of PCM samples per channel the packet decodes to at
/// the given sample rate.
///
/// Pure and stateless: only the packet's TOC header bytes are inspected, the
/// packet is not decoded. A malformed or empty packet is an error.
///
/// `sample_rate` must be one of 8000, 12000, 16000, 24000 or 48000.
pub fn nb_samples(packet: &[u8], sample_rate: i32) -> Result<usize, PacketError> {
    let data = if packet.is_empty() {
        ptr::null()
    } else {
        packet.as_ptr()
    };

    let n = unsafe { ffi::opus_packet_get_nb_samples(data, packet.len() as i32, sample_rate) };
    if n < 0 {
        return Err(PacketError::Invalid {
            code: n,
            message: ffi::error_string(n),
        });
    }
    Ok(n as usize)
}
