//! Ogg stream state wrapper.

use std::marker::PhantomData;
use std::os::raw::c_int;
use std::{mem, ptr, slice};

use thiserror::Error;

use super::ffi;
use super::packet::Packet;

/// Ogg stream error.
#[derive(Debug, Error)]
pub enum StreamError {
    /// `ogg_stream_init` returned a negative status.
    #[error("ogg: stream init failed (code {0})")]
    InitFailed(i32),
    /// `ogg_stream_packetin` returned a negative status.
    #[error("ogg: packet submit failed (code {0})")]
    PacketInFailed(i32),
    /// `ogg_stream_reset` returned a negative status.
    #[error("ogg: stream reset failed (code {0})")]
    ResetFailed(i32),
}

/// Encode state for one logical Ogg bitstream.
///
/// Wraps libogg's `ogg_stream_state`: packets go in through
/// [`packet_in`](Stream::packet_in), completed pages come out through
/// [`page_out`](Stream::page_out) and [`flush`](Stream::flush). The native
/// state is torn down with `ogg_stream_clear` on drop.
///
/// All operations take `&mut self`; libogg requires a single writer per
/// stream state, and distinct streams are independent.
pub struct Stream {
    state: Box<ffi::OggStreamState>,
}

// Safety: the boxed state is only touched through &mut self, so moving the
// wrapper to another thread hands over exclusive access.
unsafe impl Send for Stream {}

impl Drop for Stream {
    fn drop(&mut self) {
        // Frees the buffers libogg allocated inside the state; the state
        // itself is freed by the Box.
        unsafe { ffi::ogg_stream_clear(&mut *self.state) };
    }
}

impl Stream {
    /// Creates a stream tagged with the given serial number.
    pub fn new(serial: i32) -> Result<Self, StreamError> {
        let mut state: Box<ffi::OggStreamState> = Box::new(unsafe { mem::zeroed() });
        let ret = unsafe { ffi::ogg_stream_init(&mut *state, serial as c_int) };
        if ret != 0 {
            return Err(StreamError::InitFailed(ret));
        }
        Ok(Self { state })
    }

    /// Returns the serial number this stream was created with.
    pub fn serial(&self) -> i32 {
        self.state.serialno as i32
    }

    /// Returns the number of the next page the stream will emit.
    pub fn page_number(&self) -> i64 {
        self.state.pageno as i64
    }

    /// Returns true once a packet with the end-of-stream flag has been
    /// submitted.
    pub fn eos_seen(&self) -> bool {
        self.state.e_o_s != 0
    }

    /// Feeds one packet into the stream's lacing queue.
    ///
    /// libogg copies the packet body, so `packet` can be dropped afterwards.
    pub fn packet_in(&mut self, packet: &Packet) -> Result<(), StreamError> {
        let mut raw = packet.to_ffi();
        let ret = unsafe { ffi::ogg_stream_packetin(&mut *self.state, &mut raw) };
        if ret != 0 {
            return Err(StreamError::PacketInFailed(ret));
        }
        Ok(())
    }

    /// Attempts to emit one completed page from buffered packets.
    ///
    /// `None` means not enough data has been buffered yet; feed more packets
    /// and try again. It is never an error.
    pub fn page_out(&mut self) -> Option<PageRef<'_>> {
        self.emit(ffi::ogg_stream_pageout)
    }

    /// Forces emission of a page even if libogg would normally wait for
    /// more data. Used to push out header pages and stream tails.
    ///
    /// `None` means the stream has nothing buffered at all.
    pub fn flush(&mut self) -> Option<PageRef<'_>> {
        self.emit(ffi::ogg_stream_flush)
    }

    /// Resets the stream back to its just-initialized state, keeping the
    /// serial number.
    pub fn reset(&mut self) -> Result<(), StreamError> {
        let ret = unsafe { ffi::ogg_stream_reset(&mut *self.state) };
        if ret != 0 {
            return Err(StreamError::ResetFailed(ret));
        }
        Ok(())
    }

    fn emit(
        &mut self,
        f: unsafe extern "C" fn(*mut ffi::OggStreamState, *mut ffi::OggPage) -> c_int,
    ) -> Option<PageRef<'_>> {
        let mut raw = ffi::OggPage {
            header: ptr::null_mut(),
            header_len: 0,
            body: ptr::null_mut(),
            body_len: 0,
        };
        let ret = unsafe { f(&mut *self.state, &mut raw) };
        if ret == 0 {
            return None;
        }
        Some(PageRef {
            raw,
            _stream: PhantomData,
        })
    }
}

/// A view over one physical Ogg page.
///
/// The header and body point into memory owned by the [`Stream`] that
/// produced the page; the borrow keeps the stream locked until the view is
/// dropped. Use [`to_owned`](PageRef::to_owned) to retain the bytes past the
/// next mutating call.
pub struct PageRef<'a> {
    raw: ffi::OggPage,
    _stream: PhantomData<&'a Stream>,
}

impl PageRef<'_> {
    /// Returns the page header bytes (starting with the `OggS` capture
    /// pattern).
    pub fn header(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.raw.header, self.raw.header_len as usize) }
    }

    /// Returns the page body bytes.
    pub fn body(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.raw.body, self.raw.body_len as usize) }
    }

    /// Copies the page out of the stream's buffers.
    pub fn to_owned(&self) -> Page {
        Page {
            header: self.header().to_vec(),
            body: self.body().to_vec(),
        }
    }
}

/// An Ogg page copied out of its stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    header: Vec<u8>,
    body: Vec<u8>,
}

impl Page {
    /// Returns the page header bytes.
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// Returns the page body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Concatenates header and body into the page's wire form.
    pub fn into_vec(self) -> Vec<u8> {
        let mut out = self.header;
        out.extend_from_slice(&self.body);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts packets completed by each page of a raw Ogg byte stream.
    /// A lacing value below 255 terminates one packet.
    fn count_packets(mut buf: &[u8]) -> usize {
        let mut packets = 0;
        while !buf.is_empty() {
            assert_eq!(&buf[..4], b"OggS");
            let n_segments = buf[26] as usize;
            let lacing = &buf[27..27 + n_segments];
            packets += lacing.iter().filter(|&&v| v < 255).count();
            let body_len: usize = lacing.iter().map(|&v| v as usize).sum();
            buf = &buf[27 + n_segments + body_len..];
        }
        packets
    }

    #[test]
    fn test_empty_stream_has_no_page() {
        for serial in [0, 1, 42, i32::MAX, -7] {
            let mut stream = Stream::new(serial).unwrap();
            assert_eq!(stream.serial(), serial);
            assert!(stream.page_out().is_none());
            assert!(stream.flush().is_none());
        }
    }

    #[test]
    fn test_packet_roundtrip_preserves_count() {
        let mut stream = Stream::new(99).unwrap();
        let n = 5;

        for i in 0..n {
            let packet = Packet::from_slice(&[0xFC, i as u8])
                .with_bos(i == 0)
                .with_eos(i == n - 1)
                .with_granule_position((i as i64 + 1) * 960)
                .with_packet_number(i as i64);
            stream.packet_in(&packet).unwrap();
        }

        let mut wire = Vec::new();
        while let Some(page) = stream.page_out() {
            wire.extend_from_slice(page.header());
            wire.extend_from_slice(page.body());
        }
        while let Some(page) = stream.flush() {
            wire.extend_from_slice(page.header());
            wire.extend_from_slice(page.body());
        }

        assert!(stream.eos_seen());
        assert!(stream.page_number() >= 1);
        assert_eq!(count_packets(&wire), n);
    }

    #[test]
    fn test_flush_forces_header_page() {
        let mut stream = Stream::new(7).unwrap();
        let head = Packet::from_slice(b"OpusHead").with_bos(true);
        stream.packet_in(&head).unwrap();

        // A lone small packet is not enough for pageout...
        assert!(stream.page_out().is_none());

        // ...but flush forces it onto its own page.
        let page = stream.flush().expect("flush should emit the header page");
        assert_eq!(&page.header()[..4], b"OggS");
        assert_eq!(page.body(), b"OpusHead");
    }

    #[test]
    fn test_copied_page_outlives_stream_call() {
        let mut stream = Stream::new(3).unwrap();
        stream
            .packet_in(&Packet::from_slice(&[1, 2, 3]).with_bos(true))
            .unwrap();
        let owned: Page = stream.flush().unwrap().to_owned();

        // Mutating the stream again must not disturb the copy.
        stream.packet_in(&Packet::from_slice(&[4]).with_eos(true)).unwrap();
        let _ = stream.flush();
        assert_eq!(owned.body(), &[1, 2, 3]);

        let wire = owned.clone().into_vec();
        assert_eq!(&wire[..4], b"OggS");
        assert_eq!(&wire[wire.len() - 3..], &[1, 2, 3]);
    }

    #[test]
    fn test_reset_discards_buffered_packets() {
        let mut stream = Stream::new(11).unwrap();
        stream
            .packet_in(&Packet::from_slice(&[0xFC]).with_bos(true))
            .unwrap();
        stream.reset().unwrap();
        assert!(stream.flush().is_none());
        assert_eq!(stream.serial(), 11);
    }
}
