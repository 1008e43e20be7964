//! Frame (package) aggregate

use super::{Configuration, Error, Header, MIN_FRAME_OVERHEAD, Result};

/// One complete protocol message: header, configuration and channel values
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frame {
    header: Header,
    config: Configuration,
    channels: Vec<u16>,
}

impl Frame {
    /// Create a new frame
    ///
    /// The number of channel values must match the configured channel count.
    /// Values wider than the configured resolution are accepted and truncated to
    /// their low bits when encoding; see [`Frame::out_of_range_channels`].
    pub fn new(
        header: Header,
        config: Configuration,
        channels: impl Into<Vec<u16>>,
    ) -> Result<Self> {
        let channels = channels.into();
        let expected = usize::from(config.channel_count());
        if channels.len() != expected {
            return Err(Error::ChannelCountMismatch {
                expected,
                got: channels.len(),
            });
        }

        Ok(Self {
            header,
            config,
            channels,
        })
    }

    /// Get header
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// Get channel values
    #[must_use]
    pub fn channels(&self) -> &[u16] {
        &self.channels
    }

    /// Packet uid
    #[must_use]
    pub const fn uid(&self) -> u8 {
        self.header.uid
    }

    /// Transmitter id
    #[must_use]
    pub const fn transmitter_id(&self) -> u8 {
        self.header.transmitter_id
    }

    /// Indices of channel values that will be truncated on encode
    pub fn out_of_range_channels(&self) -> impl Iterator<Item = usize> + '_ {
        let max = self.config.resolution().max_value();
        self.channels
            .iter()
            .enumerate()
            .filter(move |(_, value)| **value > max)
            .map(|(index, _)| index)
    }

    /// Size of the encoded frame in bytes
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        MIN_FRAME_OVERHEAD - 1 + self.config.header_len() + self.config.data_bytes_count()
    }

    /// Encode frame to bytes
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        super::encode(self)
    }

    pub(crate) fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub(crate) fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    /// Install a decoded configuration and zeroed channel storage
    pub(crate) fn reset_layout(&mut self, config: Configuration) {
        self.channels = vec![0; usize::from(config.channel_count())];
        self.config = config;
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [u16] {
        &mut self.channels
    }
}

impl Default for Frame {
    fn default() -> Self {
        let config = Configuration::default();
        Self {
            header: Header::default(),
            channels: vec![0; usize::from(config.channel_count())],
            config,
        }
    }
}
