//! Frame header and uid generation

use std::sync::atomic::{AtomicU8, Ordering};

/// Frame header: packet uid and sender id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// Logical packet instance id
    pub uid: u8,
    /// Sender id, unique per transmitter
    pub transmitter_id: u8,
}

impl Header {
    /// Create a new header
    #[must_use]
    pub const fn new(uid: u8, transmitter_id: u8) -> Self {
        Self {
            uid,
            transmitter_id,
        }
    }
}

/// Auto-incrementing uid source.
///
/// Owned by the caller and optionally shared with a [`FrameDecoder`] so that
/// locally generated uids continue after the last uid seen on the wire. Uids wrap
/// after 255. Round-tripping frames never depends on it.
///
/// [`FrameDecoder`]: super::FrameDecoder
#[derive(Debug, Default)]
pub struct UidGenerator {
    last: AtomicU8,
}

impl UidGenerator {
    /// Create a generator whose first uid is 1
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_after(0)
    }

    /// Create a generator whose first uid is `last + 1`
    #[must_use]
    pub const fn starting_after(last: u8) -> Self {
        Self {
            last: AtomicU8::new(last),
        }
    }

    /// Advance and return the next uid
    pub fn next_uid(&self) -> u8 {
        self.last.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Record a uid observed on the wire
    pub fn observe(&self, uid: u8) {
        self.last.store(uid, Ordering::Relaxed);
    }

    /// Last uid generated or observed
    #[must_use]
    pub fn last_seen(&self) -> u8 {
        self.last.load(Ordering::Relaxed)
    }

    /// Build a header carrying the next uid
    pub fn header(&self, transmitter_id: u8) -> Header {
        Header::new(self.next_uid(), transmitter_id)
    }
}
