//! Per-stream decode counters

use std::sync::atomic::{AtomicU64, Ordering};

use crate::protocol::Error;

/// Counters for one decoded byte stream.
///
/// Shareable through `Arc` so a consumer can watch a stream that a driver thread
/// is decoding.
#[derive(Debug, Default)]
pub struct StreamMetrics {
    bytes_received: AtomicU64,
    frames_decoded: AtomicU64,
    checksum_failures: AtomicU64,
    end_byte_failures: AtomicU64,
}

impl StreamMetrics {
    /// Create zeroed counters
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes_received: AtomicU64::new(0),
            frames_decoded: AtomicU64::new(0),
            checksum_failures: AtomicU64::new(0),
            end_byte_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_bytes(&self, count: usize) {
        self.bytes_received
            .fetch_add(u64::try_from(count).unwrap_or(u64::MAX), Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_frame(&self) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_error(&self, error: &Error) {
        match error {
            Error::ChecksumMismatch { .. } => {
                self.checksum_failures.fetch_add(1, Ordering::Relaxed);
            }
            Error::MissingEndByte { .. } => {
                self.end_byte_failures.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    /// Current counter values
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            checksum_failures: self.checksum_failures.load(Ordering::Relaxed),
            end_byte_failures: self.end_byte_failures.load(Ordering::Relaxed),
        }
    }
}

/// Lightweight snapshot of stream counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Bytes fed to the decoder
    pub bytes_received: u64,
    /// Frames completed successfully
    pub frames_decoded: u64,
    /// Frames dropped on checksum mismatch
    pub checksum_failures: u64,
    /// Frames dropped on a missing end byte
    pub end_byte_failures: u64,
}

impl MetricsSnapshot {
    /// Frames dropped for any reason
    #[must_use]
    pub const fn frames_dropped(&self) -> u64 {
        self.checksum_failures + self.end_byte_failures
    }

    /// Fraction of terminated frames that were dropped
    #[must_use]
    pub fn drop_rate(&self) -> Option<f64> {
        let total = self.frames_decoded + self.frames_dropped();
        if total == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let rate = self.frames_dropped() as f64 / total as f64;
        Some(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = StreamMetrics::new();
        metrics.record_bytes(12);
        metrics.record_frame();
        metrics.record_error(&Error::ChecksumMismatch {
            expected: 1,
            found: 2,
        });
        metrics.record_error(&Error::MissingEndByte { found: 0 });
        metrics.record_error(&Error::UnsupportedChannelCount { count: 3 });

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.bytes_received, 12);
        assert_eq!(snapshot.frames_decoded, 1);
        assert_eq!(snapshot.checksum_failures, 1);
        assert_eq!(snapshot.end_byte_failures, 1);
        assert_eq!(snapshot.frames_dropped(), 2);
    }

    #[test]
    fn test_drop_rate() {
        assert_eq!(MetricsSnapshot::default().drop_rate(), None);

        let snapshot = MetricsSnapshot {
            frames_decoded: 3,
            checksum_failures: 1,
            ..MetricsSnapshot::default()
        };
        assert_eq!(snapshot.drop_rate(), Some(0.25));
    }
}
