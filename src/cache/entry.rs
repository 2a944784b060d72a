//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Instant;

/// Nanoseconds in one second, used to turn TTL seconds into clock ticks.
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

// == Cache Entry ==
/// Represents a single cache entry with its payload and expiration deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The stored payload, opaque to the cache
    pub value: Vec<u8>,
    /// Expiration deadline in nanoseconds on the store clock, None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with an already scheduled deadline.
    pub fn new(value: Vec<u8>, expires_at: Option<u64>) -> Self {
        Self { value, expires_at }
    }

    // == Is Scheduled At ==
    /// Returns true if this entry is the one scheduled under `deadline`.
    ///
    /// Deadlines are unique, so a queued expiration whose deadline no longer
    /// matches belongs to an overwritten or deleted value.
    pub fn is_scheduled_at(&self, deadline: u64) -> bool {
        self.expires_at == Some(deadline)
    }
}

// == Store Clock ==
/// Monotonic nanosecond clock anchored at the moment the store was created.
///
/// Wall-clock adjustments never move deadlines, and the 64-bit range covers
/// roughly 584 years of uptime.
#[derive(Debug, Clone, Copy)]
pub struct StoreClock {
    origin: Instant,
}

impl StoreClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Nanoseconds elapsed since the clock was created.
    pub fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

impl Default for StoreClock {
    fn default() -> Self {
        Self::new()
    }
}
