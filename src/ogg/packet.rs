//! Ogg packet type.

use std::os::raw::c_long;

use super::ffi;

/// Granule position value meaning "no position recorded for this packet".
pub const GRANULE_POS_UNSET: i64 = -1;

/// A single compressed packet plus its stream metadata.
///
/// Owns its bytes; `ogg_stream_packetin` copies the body into the stream's
/// internal buffer, so the packet can be dropped as soon as the call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    data: Vec<u8>,
    bos: bool,
    eos: bool,
    granule_position: i64,
    packet_number: i64,
}

impl Packet {
    /// Creates a packet with no flags set and an unset granule position.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            bos: false,
            eos: false,
            granule_position: GRANULE_POS_UNSET,
            packet_number: 0,
        }
    }

    /// Creates a packet from a byte slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }

    /// Marks this packet as the first of its logical stream.
    pub fn with_bos(mut self, bos: bool) -> Self {
        self.bos = bos;
        self
    }

    /// Marks this packet as the last of its logical stream.
    pub fn with_eos(mut self, eos: bool) -> Self {
        self.eos = eos;
        self
    }

    /// Sets the absolute sample-time position of this packet.
    ///
    /// Must be non-decreasing across the packets of one stream, except for
    /// the [`GRANULE_POS_UNSET`] sentinel.
    pub fn with_granule_position(mut self, pos: i64) -> Self {
        self.granule_position = pos;
        self
    }

    /// Sets the packet sequence number.
    pub fn with_packet_number(mut self, no: i64) -> Self {
        self.packet_number = no;
        self
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the packet body is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the beginning-of-stream flag is set.
    pub fn is_bos(&self) -> bool {
        self.bos
    }

    /// Returns true if the end-of-stream flag is set.
    pub fn is_eos(&self) -> bool {
        self.eos
    }

    /// Returns the granule position.
    pub fn granule_position(&self) -> i64 {
        self.granule_position
    }

    /// Returns the packet sequence number.
    pub fn packet_number(&self) -> i64 {
        self.packet_number
    }

    /// Builds the transient C view libogg reads during `ogg_stream_packetin`.
    ///
    /// The view aliases `self.data`; it must not outlive `self` or cross a
    /// call that mutates the packet.
    pub(crate) fn to_ffi(&self) -> ffi::OggPacket {
        ffi::OggPacket {
            packet: self.data.as_ptr() as *mut u8,
            bytes: self.data.len() as c_long,
            b_o_s: self.bos as c_long,
            e_o_s: self.eos as c_long,
            granulepos: self.granule_position,
            packetno: self.packet_number,
        }
    }
}
