//! Frame configuration and its header-byte layout

use super::{
    CHANNEL_INDEX_SHIFT, CONTINUATION_BIT, ERROR_FLAG, Error, MAX_ADDITIONAL_CONFIG_VALUE,
    MAX_ROUTING_LENGTH, Resolution, Result, channel_count_from_index, channel_count_index,
};

/// Layout of one frame: channel count, resolution and optional mesh extension
///
/// # Wire Format
///
/// ```text
///  7   6   5   4   3   2   1   0
/// +---+---+-----------+-----------+
/// | F | E | ch. index | res index |   config byte
/// +---+---+-----------+-----------+
/// | C | 0   0   0 | routing len   |   mesh byte (only if F)
/// +---+---------------------------+
/// | C |   additional config (7)   |   repeated while the previous C is set
/// +---+---------------------------+
/// ```
///
/// `F` is set whenever a routing length or additional config is present, `E` is
/// the sender-side error flag and `C` marks that another extension byte follows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Configuration {
    channel_count: u16,
    resolution: Resolution,
    error: bool,
    routing_length: u8,
    additional_config: Vec<u8>,
}

impl Configuration {
    /// Create a configuration without mesh extension
    pub fn new(channel_count: u16, resolution: Resolution) -> Result<Self> {
        if channel_count_index(channel_count).is_none() {
            return Err(Error::UnsupportedChannelCount {
                count: channel_count,
            });
        }

        Ok(Self {
            channel_count,
            resolution,
            error: false,
            routing_length: 0,
            additional_config: Vec::new(),
        })
    }

    /// Set the sender-side error flag
    #[must_use]
    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    /// Attach mesh routing metadata
    ///
    /// `routing_length` must fit four bits and every additional-config byte seven
    /// bits; the eighth bit of each chained byte is the continuation bit.
    pub fn with_routing(mut self, routing_length: u8, additional_config: &[u8]) -> Result<Self> {
        if routing_length > MAX_ROUTING_LENGTH {
            return Err(Error::RoutingLengthOutOfRange {
                length: routing_length,
                max: MAX_ROUTING_LENGTH,
            });
        }

        if let Some((index, &value)) = additional_config
            .iter()
            .enumerate()
            .find(|(_, value)| **value > MAX_ADDITIONAL_CONFIG_VALUE)
        {
            return Err(Error::AdditionalConfigOutOfRange {
                index,
                value,
                max: MAX_ADDITIONAL_CONFIG_VALUE,
            });
        }

        self.routing_length = routing_length;
        self.additional_config = additional_config.to_vec();
        Ok(self)
    }

    /// Number of channels per frame
    #[must_use]
    pub const fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Channel sample width
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Sender-side error flag
    #[must_use]
    pub const fn error(&self) -> bool {
        self.error
    }

    /// Mesh routing length (0 if the frame is not routed)
    #[must_use]
    pub const fn routing_length(&self) -> u8 {
        self.routing_length
    }

    /// Additional extension bytes, continuation bits stripped
    #[must_use]
    pub fn additional_config(&self) -> &[u8] {
        &self.additional_config
    }

    /// Whether the frame carries mesh routing metadata
    #[must_use]
    pub const fn is_mesh_package(&self) -> bool {
        self.routing_length != 0
    }

    /// Whether the mesh byte is emitted
    #[must_use]
    pub fn has_extension(&self) -> bool {
        self.is_mesh_package() || !self.additional_config.is_empty()
    }

    /// Bytes needed to bit-pack all channel values
    #[must_use]
    pub fn data_bytes_count(&self) -> usize {
        (self.resolution.bits_per_channel() * usize::from(self.channel_count)).div_ceil(8)
    }

    /// Number of header bytes produced by [`Configuration::to_bytes`]
    #[must_use]
    pub fn header_len(&self) -> usize {
        if self.has_extension() {
            2 + self.additional_config.len()
        } else {
            1
        }
    }

    /// Serialize into the config byte plus optional extension bytes
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let index = channel_count_index(self.channel_count).unwrap_or_default();
        let mut bytes = Vec::with_capacity(self.header_len());

        let mut config = self.resolution.index() | (index << CHANNEL_INDEX_SHIFT);
        if self.error {
            config |= ERROR_FLAG;
        }
        bytes.push(config);

        if self.has_extension() {
            bytes[0] |= CONTINUATION_BIT;
            bytes.push(self.routing_length);

            for &extra in &self.additional_config {
                if let Some(previous) = bytes.last_mut() {
                    *previous |= CONTINUATION_BIT;
                }
                bytes.push(extra);
            }
        }

        bytes
    }

    /// Decode the fields carried by a config byte.
    ///
    /// Returns the configuration and whether a mesh byte follows.
    pub(crate) fn from_config_byte(byte: u8) -> (Self, bool) {
        let config = Self {
            channel_count: channel_count_from_index(byte >> CHANNEL_INDEX_SHIFT),
            resolution: Resolution::from_bits(byte),
            error: byte & ERROR_FLAG != 0,
            routing_length: 0,
            additional_config: Vec::new(),
        };
        (config, byte & CONTINUATION_BIT != 0)
    }

    pub(crate) fn set_routing_length(&mut self, routing_length: u8) {
        self.routing_length = routing_length;
    }

    pub(crate) fn push_additional_config(&mut self, value: u8) {
        self.additional_config.push(value);
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            channel_count: 1,
            resolution: Resolution::default(),
            error: false,
            routing_length: 0,
            additional_config: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CHANNEL_COUNTS;

    #[test]
    fn test_config_byte_layout() {
        let config = Configuration::new(4, Resolution::Steps4096).unwrap();
        assert_eq!(config.to_bytes(), vec![0x17]);
        assert_eq!(config.data_bytes_count(), 6);
        assert!(!config.has_extension());
    }

    #[test]
    fn test_error_flag() {
        let config = Configuration::new(1, Resolution::Steps32)
            .unwrap()
            .with_error(true);
        assert_eq!(config.to_bytes(), vec![0x40]);
    }

    #[test]
    fn test_table_fidelity() {
        for &count in &CHANNEL_COUNTS {
            for resolution in Resolution::ALL {
                let config = Configuration::new(count, resolution).unwrap();
                let bytes = config.to_bytes();
                assert_eq!(bytes.len(), 1);

                let (decoded, follows) = Configuration::from_config_byte(bytes[0]);
                assert!(!follows);
                assert_eq!(decoded.channel_count(), count);
                assert_eq!(decoded.resolution(), resolution);
            }
        }
    }

    #[test]
    fn test_unsupported_channel_count() {
        let result = Configuration::new(3, Resolution::Steps256);
        assert!(matches!(
            result,
            Err(Error::UnsupportedChannelCount { count: 3 })
        ));
    }

    #[test]
    fn test_mesh_byte_without_additional_config() {
        let config = Configuration::new(4, Resolution::Steps128)
            .unwrap()
            .with_routing(3, &[])
            .unwrap();
        assert!(config.is_mesh_package());
        assert_eq!(config.to_bytes(), vec![0x92, 0x03]);
    }

    #[test]
    fn test_continuation_chain() {
        let config = Configuration::new(4, Resolution::Steps4096)
            .unwrap()
            .with_routing(3, &[0x05, 0x11])
            .unwrap();
        assert_eq!(config.to_bytes(), vec![0x97, 0x83, 0x85, 0x11]);
        assert_eq!(config.header_len(), 4);
    }

    #[test]
    fn test_additional_config_forces_mesh_byte() {
        let config = Configuration::new(1, Resolution::Steps32)
            .unwrap()
            .with_routing(0, &[0x7F])
            .unwrap();
        assert!(!config.is_mesh_package());
        assert!(config.has_extension());
        assert_eq!(config.to_bytes(), vec![0x80, 0x80, 0x7F]);
    }

    #[test]
    fn test_routing_validation() {
        let config = Configuration::new(2, Resolution::Steps64).unwrap();
        assert!(matches!(
            config.clone().with_routing(16, &[]),
            Err(Error::RoutingLengthOutOfRange { length: 16, .. })
        ));
        assert!(matches!(
            config.with_routing(1, &[0x01, 0x80]),
            Err(Error::AdditionalConfigOutOfRange {
                index: 1,
                value: 0x80,
                ..
            })
        ));
    }

    #[test]
    fn test_data_bytes_count_rounds_up() {
        let config = Configuration::new(1, Resolution::Steps32).unwrap();
        assert_eq!(config.data_bytes_count(), 1);
        let config = Configuration::new(4, Resolution::Steps128).unwrap();
        assert_eq!(config.data_bytes_count(), 4);
        let config = Configuration::new(256, Resolution::Steps4096).unwrap();
        assert_eq!(config.data_bytes_count(), 384);
    }
}
