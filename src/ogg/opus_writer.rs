//! Opus-in-Ogg writer backed by libogg.
//!
//! Wraps a [`Stream`] with the RFC 7845 framing: an OpusHead page, an
//! OpusTags page, then audio packets with granule positions advanced by
//! each packet's sample count.

use std::io::{self, Write};

use thiserror::Error;

use super::packet::Packet;
use super::stream::{Stream, StreamError};
use crate::opus::{self, PacketError};

const VENDOR: &[u8] = b"oggopus";
// No encoder delay to trim from the stream start.
const PRE_SKIP: u16 = 0;
// OpusHead and OpusTags occupy packet numbers 0 and 1.
const FIRST_AUDIO_PACKETNO: i64 = 2;

/// Opus writer error.
#[derive(Debug, Error)]
pub enum WriterError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Packet(#[from] PacketError),
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The writer was used after `finish`.
    #[error("ogg: writer already finished")]
    Finished,
}

/// Writes Opus packets into an Ogg container.
///
/// One packet is always held back so the final one can carry the
/// end-of-stream flag; call [`finish`](OpusWriter::finish) to emit it and
/// the remaining pages.
pub struct OpusWriter<W: Write> {
    writer: W,
    stream: Stream,
    pending: Option<Vec<u8>>,
    granule: i64,
    packetno: i64,
    finished: bool,
}

impl<W: Write> OpusWriter<W> {
    /// Creates a writer and emits the OpusHead/OpusTags header pages.
    ///
    /// `sample_rate` is the original input rate recorded in the ID header;
    /// decoding always produces 48kHz output. `channels` is 1 or 2.
    pub fn new(writer: W, sample_rate: u32, channels: u8) -> Result<Self, WriterError> {
        Self::with_serial(writer, sample_rate, channels, 0)
    }

    /// Creates a writer for a stream with the given serial number.
    pub fn with_serial(
        writer: W,
        sample_rate: u32,
        channels: u8,
        serial: i32,
    ) -> Result<Self, WriterError> {
        let mut ow = Self {
            writer,
            stream: Stream::new(serial)?,
            pending: None,
            granule: 0,
            packetno: FIRST_AUDIO_PACKETNO,
            finished: false,
        };

        // The ID header must finish its own page before any other packet,
        // so each header is flushed out separately.
        let head = Packet::new(id_header(sample_rate, channels))
            .with_bos(true)
            .with_granule_position(0)
            .with_packet_number(0);
        ow.stream.packet_in(&head)?;
        ow.flush_pages()?;

        let tags = Packet::new(comment_header())
            .with_granule_position(0)
            .with_packet_number(1);
        ow.stream.packet_in(&tags)?;
        ow.flush_pages()?;

        Ok(ow)
    }

    /// Returns the granule position of the last submitted audio packet.
    pub fn granule_position(&self) -> i64 {
        self.granule
    }

    /// Returns the stream serial number.
    pub fn serial(&self) -> i32 {
        self.stream.serial()
    }

    /// Queues one encoded Opus packet.
    ///
    /// The packet's sample count (from its TOC header, at 48kHz) advances
    /// the stream's granule position. Completed pages are written out as
    /// they become available.
    pub fn write_packet(&mut self, frame: &[u8]) -> Result<(), WriterError> {
        if self.finished {
            return Err(WriterError::Finished);
        }
        if let Some(prev) = self.pending.replace(frame.to_vec()) {
            self.submit(prev, false)?;
        }
        Ok(())
    }

    /// Emits the held-back packet with the end-of-stream flag and flushes
    /// all remaining pages.
    pub fn finish(&mut self) -> Result<(), WriterError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if let Some(last) = self.pending.take() {
            self.submit(last, true)?;
        }
        self.flush_pages()?;
        Ok(())
    }

    fn submit(&mut self, frame: Vec<u8>, eos: bool) -> Result<(), WriterError> {
        self.granule += opus::nb_samples(&frame, 48000)? as i64;
        let packet = Packet::new(frame)
            .with_eos(eos)
            .with_granule_position(self.granule)
            .with_packet_number(self.packetno);
        self.packetno += 1;
        self.stream.packet_in(&packet)?;
        self.drain_pages()?;
        Ok(())
    }

    fn drain_pages(&mut self) -> io::Result<()> {
        while let Some(page) = self.stream.page_out() {
            self.writer.write_all(page.header())?;
            self.writer.write_all(page.body())?;
        }
        Ok(())
    }

    fn flush_pages(&mut self) -> io::Result<()> {
        while let Some(page) = self.stream.flush() {
            self.writer.write_all(page.header())?;
            self.writer.write_all(page.body())?;
        }
        Ok(())
    }
}

/// RFC 7845 §5.1 identification header.
fn id_header(sample_rate: u32, channels: u8) -> Vec<u8> {
    let mut head = vec![0u8; 19];
    head[..8].copy_from_slice(b"OpusHead");
    head[8] = 1; // Version
    head[9] = channels;
    head[10..12].copy_from_slice(&PRE_SKIP.to_le_bytes());
    head[12..16].copy_from_slice(&sample_rate.to_le_bytes());
    head[16..18].copy_from_slice(&0u16.to_le_bytes()); // Output gain
    head[18] = 0; // Channel mapping family
    head
}

/// RFC 7845 §5.2 comment header.
fn comment_header() -> Vec<u8> {
    let mut tags = Vec::with_capacity(16 + VENDOR.len());
    tags.extend_from_slice(b"OpusTags");
    tags.extend_from_slice(&(VENDOR.len() as u32).to_le_bytes());
    tags.extend_from_slice(VENDOR);
    tags.extend_from_slice(&0u32.to_le_bytes()); // No user comments
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_emits_header_pages() {
        let mut buf = Vec::new();
        let writer = OpusWriter::new(&mut buf, 48000, 2).unwrap();
        drop(writer);

        // Two forced pages: BOS with OpusHead, then OpusTags.
        assert_eq!(&buf[..4], b"OggS");
        assert_eq!(buf[5], 0x02); // header_type: beginning of stream
        let body = &buf[28..]; // 27-byte header + 1 lacing value
        assert_eq!(&body[..8], b"OpusHead");
        let second = body[19..].windows(8).position(|w| w == b"OpusTags");
        assert!(second.is_some());
    }

    #[test]
    fn test_writer_tracks_granule() {
        let mut buf = Vec::new();
        let mut writer = OpusWriter::new(&mut buf, 48000, 2).unwrap();

        // 20ms CELT fullband stereo packets: 960 samples each at 48kHz.
        writer.write_packet(&[0xFC]).unwrap();
        writer.write_packet(&[0xFC]).unwrap();
        writer.write_packet(&[0xFC]).unwrap();

        // The last packet is held back until finish.
        assert_eq!(writer.granule_position(), 1920);
        writer.finish().unwrap();
        assert_eq!(writer.granule_position(), 2880);
    }

    #[test]
    fn test_writer_rejects_malformed_packet() {
        let mut buf = Vec::new();
        let mut writer = OpusWriter::new(&mut buf, 48000, 2).unwrap();

        writer.write_packet(&[]).unwrap();
        // The empty packet surfaces as a libopus error when submitted.
        let err = writer.write_packet(&[0xFC]).unwrap_err();
        assert!(matches!(err, WriterError::Packet(_)));
    }

    #[test]
    fn test_write_after_finish() {
        let mut buf = Vec::new();
        let mut writer = OpusWriter::new(&mut buf, 48000, 2).unwrap();
        writer.write_packet(&[0xFC]).unwrap();
        writer.finish().unwrap();
        assert!(matches!(
            writer.write_packet(&[0xFC]),
            Err(WriterError::Finished)
        ));
        // finish is idempotent.
        writer.finish().unwrap();
    }

    #[test]
    fn test_last_page_carries_eos() {
        let mut buf = Vec::new();
        let mut writer = OpusWriter::new(&mut buf, 48000, 2).unwrap();
        for _ in 0..4 {
            writer.write_packet(&[0xFC]).unwrap();
        }
        writer.finish().unwrap();

        // Walk to the final page and check its header_type flag.
        let mut rest: &[u8] = &buf;
        let mut last_type = 0u8;
        while !rest.is_empty() {
            assert_eq!(&rest[..4], b"OggS");
            last_type = rest[5];
            let n_segments = rest[26] as usize;
            let body_len: usize = rest[27..27 + n_segments].iter().map(|&v| v as usize).sum();
            rest = &rest[27 + n_segments + body_len..];
        }
        assert_eq!(last_type & 0x04, 0x04); // end of stream
    }
}
