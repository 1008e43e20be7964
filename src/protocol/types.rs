//! Resolution and channel-count lookup tables

use std::fmt;

use super::RESOLUTION_MASK;

/// Supported channel counts, indexed by the 3-bit field of the config byte
pub const CHANNEL_COUNTS: [u16; 8] = [1, 2, 4, 8, 16, 32, 64, 256];

/// Look up the 3-bit config index of a channel count
#[must_use]
pub fn channel_count_index(count: u16) -> Option<u8> {
    CHANNEL_COUNTS
        .iter()
        .position(|&supported| supported == count)
        .and_then(|index| u8::try_from(index).ok())
}

/// Channel count stored under a 3-bit config index (upper bits ignored)
#[must_use]
pub const fn channel_count_from_index(index: u8) -> u16 {
    CHANNEL_COUNTS[(index & 0b111) as usize]
}

/// Channel sample width
///
/// | index | steps | bits |
/// |-------|-------|------|
/// | 0     | 32    | 5    |
/// | 1     | 64    | 6    |
/// | 2     | 128   | 7    |
/// | 3     | 256   | 8    |
/// | 4     | 512   | 9    |
/// | 5     | 1024  | 10   |
/// | 6     | 2048  | 11   |
/// | 7     | 4096  | 12   |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Resolution {
    /// 32 steps, 5 bits per channel
    Steps32 = 0,
    /// 64 steps, 6 bits per channel
    Steps64 = 1,
    /// 128 steps, 7 bits per channel
    Steps128 = 2,
    /// 256 steps, 8 bits per channel
    Steps256 = 3,
    /// 512 steps, 9 bits per channel
    Steps512 = 4,
    /// 1024 steps, 10 bits per channel
    Steps1024 = 5,
    /// 2048 steps, 11 bits per channel
    Steps2048 = 6,
    /// 4096 steps, 12 bits per channel
    #[default]
    Steps4096 = 7,
}

impl Resolution {
    /// All resolutions in index order
    pub const ALL: [Self; 8] = [
        Self::Steps32,
        Self::Steps64,
        Self::Steps128,
        Self::Steps256,
        Self::Steps512,
        Self::Steps1024,
        Self::Steps2048,
        Self::Steps4096,
    ];

    /// Resolution for a step count.
    ///
    /// Unsupported step counts fall back to [`Resolution::Steps4096`].
    #[must_use]
    pub const fn from_steps(steps: u32) -> Self {
        match steps {
            32 => Self::Steps32,
            64 => Self::Steps64,
            128 => Self::Steps128,
            256 => Self::Steps256,
            512 => Self::Steps512,
            1024 => Self::Steps1024,
            2048 => Self::Steps2048,
            _ => Self::Steps4096,
        }
    }

    /// Decode the low three bits of a config byte
    #[must_use]
    pub const fn from_bits(field: u8) -> Self {
        Self::ALL[(field & RESOLUTION_MASK) as usize]
    }

    /// Convert from index
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index <= RESOLUTION_MASK {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Convert to index
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Number of steps a channel can express
    #[must_use]
    pub const fn steps(self) -> u32 {
        32_u32 << self.index()
    }

    /// Bits occupied by one channel value on the wire
    #[must_use]
    pub const fn bits_per_channel(self) -> usize {
        self.index() as usize + 5
    }

    /// Largest channel value representable at this resolution
    #[must_use]
    pub const fn max_value(self) -> u16 {
        (1_u16 << self.bits_per_channel()) - 1
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} steps", self.steps())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Resolution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.steps())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Resolution {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let steps = u32::deserialize(deserializer)?;
        Ok(Self::from_steps(steps))
    }
}
