//! Frame codec error types

use thiserror::Error;

/// Frame protocol errors
#[derive(Error, Debug)]
pub enum Error {
    /// Received checksum disagrees with the XOR fold of the frame
    #[error("checksum mismatch: expected {expected:#04x}, got {found:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over the received bytes
        expected: u8,
        /// Checksum byte found on the wire
        found: u8,
    },

    /// Terminator byte absent where expected
    #[error("missing end byte: expected 0x93, got {found:#04x}")]
    MissingEndByte {
        /// Byte found in place of the end marker
        found: u8,
    },

    /// Channel count has no entry in the channel-count table
    #[error("unsupported channel count: {count} (expected one of 1, 2, 4, 8, 16, 32, 64, 256)")]
    UnsupportedChannelCount {
        /// Requested channel count
        count: u16,
    },

    /// Routing length does not fit the mesh byte
    #[error("routing length out of range: {length} (max {max})")]
    RoutingLengthOutOfRange {
        /// Requested routing length
        length: u8,
        /// Maximum allowed
        max: u8,
    },

    /// Additional-config byte collides with the continuation bit
    #[error("additional config byte {index} out of range: {value:#04x} (max {max:#04x})")]
    AdditionalConfigOutOfRange {
        /// Position in the additional-config sequence
        index: usize,
        /// Offending value
        value: u8,
        /// Maximum allowed
        max: u8,
    },

    /// Number of channel values differs from the configured channel count
    #[error("channel count mismatch: configuration expects {expected} values, got {got}")]
    ChannelCountMismatch {
        /// Configured channel count
        expected: usize,
        /// Number of values supplied
        got: usize,
    },

    /// IO error from a byte source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error terminated an in-progress decode
    #[must_use]
    pub const fn is_frame_error(&self) -> bool {
        matches!(self, Self::ChecksumMismatch { .. } | Self::MissingEndByte { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
