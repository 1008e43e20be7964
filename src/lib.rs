//! rclib - compact control-channel frame codec
//!
//! Packs a variable number of channel values (control axes, switches, ...) into a
//! small framed byte sequence and reconstructs them from a byte stream of arbitrary
//! chunking.
//!
//! # Quick Start
//!
//! ```rust
//! use rclib::{Configuration, Frame, FrameDecoder, Header, Resolution};
//!
//! // Four channels at 4096 steps (12 bits each)
//! let config = Configuration::new(4, Resolution::Steps4096)?;
//! let frame = Frame::new(Header::new(0, 0), config, vec![4095, 100, 512, 4095])?;
//!
//! let bytes = frame.encode();
//! assert_eq!(bytes[0], rclib::START_BYTE);
//!
//! // Feed the bytes one at a time
//! let mut decoder = FrameDecoder::new();
//! let mut decoded = None;
//! for byte in bytes {
//!     if let Some(frame) = decoder.push(byte)? {
//!         decoded = Some(frame);
//!     }
//! }
//! assert_eq!(decoded, Some(frame));
//! # Ok::<(), rclib::Error>(())
//! ```
//!
//! # Wire Format
//!
//! ```text
//! [START 0xC9] [UID] [TID] [CONFIG] ([MESH] [ADDITIONAL...]) [DATA...] [XOR] [END 0x93]
//! ```
//!
//! Start and end markers are not escaped; a receiver realigns on the next start
//! marker after a failed frame.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod metrics;
pub mod protocol;
pub mod stream;

pub use metrics::{MetricsSnapshot, StreamMetrics};
pub use protocol::{
    CHANNEL_COUNTS, Configuration, DecodeState, END_BYTE, Error, Frame, FrameDecoder, Header,
    Resolution, Result, START_BYTE, UidGenerator, checksum, encode, encode_into,
};
pub use stream::{FrameStream, decode_channel, decode_reader};

/// Protocol version implemented by this crate
pub const VERSION: &str = "1.0";
