//! Safe wrappers over the native libogg, libopus and libopusfile codecs.
//!
//! This crate binds a small slice of the native Ogg/Opus stack and wraps it
//! in owning Rust types:
//!
//! - `ogg`: stream packetization and page emission (`ogg_stream_*`)
//! - `opus`: packet sample-count introspection (`opus_packet_get_nb_samples`)
//! - `opusfile`: decoding a complete in-memory Opus file to stereo PCM
//!   (`op_open_memory`, `op_read_stereo`)
//!
//! Each native handle is owned by exactly one wrapper and released on drop.
//! Native status codes are carried verbatim inside the error types. Calls
//! are blocking and handles are single-writer: move a wrapper between
//! threads freely, but serialize access to it.
//!
//! # Example
//!
//! ```ignore
//! use oggopus::ogg::OpusWriter;
//! use oggopus::opusfile::OpusFile;
//!
//! // Mux encoded Opus packets into an in-memory Ogg container...
//! let mut ogg = Vec::new();
//! let mut writer = OpusWriter::new(&mut ogg, 48000, 2)?;
//! for frame in frames {
//!     writer.write_packet(&frame)?;
//! }
//! writer.finish()?;
//!
//! // ...and decode it back to interleaved 16-bit stereo PCM at 48kHz.
//! let mut file = OpusFile::open_memory(ogg)?;
//! let pcm = file.read_all_stereo()?;
//! ```

pub mod ogg;
pub mod opus;
pub mod opusfile;

pub use ogg::{OpusWriter, Packet, Stream};
pub use opusfile::OpusFile;
