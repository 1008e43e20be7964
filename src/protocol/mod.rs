//! Frame protocol core implementation
//!
//! This module provides the wire format, configuration model and codec.

mod codec;
mod config;
mod error;
mod frame;
mod header;
mod types;

pub use codec::{DecodeState, FrameDecoder, checksum, encode, encode_into};
pub use config::Configuration;
pub use error::{Error, Result};
pub use frame::Frame;
pub use header::{Header, UidGenerator};
pub use types::{CHANNEL_COUNTS, Resolution, channel_count_from_index, channel_count_index};

/// Start-of-frame marker
pub const START_BYTE: u8 = 0xC9;

/// End-of-frame marker
pub const END_BYTE: u8 = 0x93;

/// Config byte: resolution index (bits 0-2)
pub(crate) const RESOLUTION_MASK: u8 = 0b0000_0111;

/// Config byte: shift of the channel-count index (bits 3-5)
pub(crate) const CHANNEL_INDEX_SHIFT: u8 = 3;

/// Config byte: sender-side error flag (bit 6)
pub(crate) const ERROR_FLAG: u8 = 1 << 6;

/// Extension/continuation bit, shared by the config byte, the mesh byte and
/// every chained additional-config byte
pub(crate) const CONTINUATION_BIT: u8 = 1 << 7;

/// Mesh byte: routing length (bits 0-3)
pub(crate) const ROUTING_LENGTH_MASK: u8 = 0b0000_1111;

/// Largest routing length the mesh byte can carry
pub const MAX_ROUTING_LENGTH: u8 = ROUTING_LENGTH_MASK;

/// Largest value of a single additional-config byte (7 payload bits)
pub const MAX_ADDITIONAL_CONFIG_VALUE: u8 = !CONTINUATION_BIT;

/// Framing overhead: start, uid, transmitter id, config, checksum, end
pub const MIN_FRAME_OVERHEAD: usize = 6;
