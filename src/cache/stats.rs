//! Cache Statistics Module
//!
//! Counters kept by the store: `get` outcomes and the reasons entries left.

use std::fmt;

// == Cache Stats ==
/// Running counters for one store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// `get` calls that found a live value
    pub hits: u64,
    /// `get` calls answered with NOT_FOUND
    pub misses: u64,
    /// Entries pushed out by capacity
    pub evictions: u64,
    /// Entries removed once their deadline passed
    pub expirations: u64,
    /// Entries held at the last update
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get` calls seen so far.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entries={}, hits={}, misses={}, hit_rate={:.2}, evictions={}, expirations={}",
            self.total_entries,
            self.hits,
            self.misses,
            self.hit_rate(),
            self.evictions,
            self.expirations
        )
    }
}
