//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and
//! lazily reconciled TTL expiration.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, ExpirationQueue, LruTracker, StoreClock};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
///
/// Expired entries are removed opportunistically at the start of every
/// `set` and `get`, by draining the due head of the expiration queue.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Scheduled expirations, possibly holding stale references
    expirations: ExpirationQueue,
    /// Live entries that carry a deadline
    scheduled: usize,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Source of expiration timestamps
    clock: StoreClock,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            expirations: ExpirationQueue::new(),
            scheduled: 0,
            stats: CacheStats::new(),
            max_entries,
            clock: StoreClock::new(),
        }
    }

    // == Set ==
    /// Stores `value` under `key`, expiring after `ttl` seconds (0 = never).
    ///
    /// Overwriting a key replaces both its value and its deadline. When the
    /// cache grows past capacity, least recently used entries are evicted
    /// until it fits again.
    ///
    /// Returns true if the key is present once the call completes; only a
    /// zero-capacity store can return false.
    pub fn set(&mut self, key: String, value: Vec<u8>, ttl: u64) -> bool {
        let now = self.clock.now();
        self.set_at(key, value, ttl, now)
    }

    pub(crate) fn set_at(&mut self, key: String, value: Vec<u8>, ttl: u64, now: u64) -> bool {
        self.expire_due(now);

        let expires_at = if ttl > 0 {
            self.expirations.schedule(&key, now, ttl)
        } else {
            None
        };

        if expires_at.is_some() {
            self.scheduled += 1;
        }
        if let Some(previous) = self
            .entries
            .insert(key.clone(), CacheEntry::new(value, expires_at))
        {
            self.forget_deadline(&previous);
        }
        self.lru.touch(&key);

        self.evict_overflow();
        self.stats.set_total_entries(self.entries.len());

        self.entries.contains_key(&key)
    }

    // == Get ==
    /// Retrieves a value by key, marking it as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&[u8]> {
        let now = self.clock.now();
        self.get_at(key, now)
    }

    pub(crate) fn get_at(&mut self, key: &str, now: u64) -> Option<&[u8]> {
        self.expire_due(now);

        if !self.entries.contains_key(key) {
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.as_slice())
    }

    // == Delete ==
    /// Removes an entry by key, returning whether it existed.
    ///
    /// Its scheduled expiration, if any, stays in the queue and is
    /// discarded as stale once due.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.remove_entry(key) {
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Purge Expired ==
    /// Removes every entry whose deadline has passed.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        self.expire_due(now)
    }

    // == Sweep ==
    /// Purges due entries, then compacts the expiration queue once it holds
    /// more than twice as many expirations as there are live deadlines.
    ///
    /// Returns `(expired entries, stale expirations dropped)`.
    pub fn sweep(&mut self) -> (usize, usize) {
        let expired = self.purge_expired();

        let compacted = if self.expirations.len() > self.scheduled.saturating_mul(2) {
            self.compact_expirations()
        } else {
            0
        };

        (expired, compacted)
    }

    /// Drops every queued expiration that no longer matches a live entry.
    pub fn compact_expirations(&mut self) -> usize {
        let entries = &self.entries;
        let dropped = self.expirations.retain(|deadline, key| {
            entries
                .get(key)
                .is_some_and(|entry| entry.is_scheduled_at(deadline))
        });

        if dropped > 0 {
            debug!("Compacted {} stale expirations", dropped);
        }
        dropped
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of queued expirations, stale ones included.
    pub fn pending_expirations(&self) -> usize {
        self.expirations.len()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    // Pops due expirations; only those still matching a live entry delete it.
    fn expire_due(&mut self, now: u64) -> usize {
        let mut removed = 0;

        while let Some((deadline, key)) = self.expirations.pop_due(now) {
            let live = self
                .entries
                .get(&key)
                .is_some_and(|entry| entry.is_scheduled_at(deadline));

            if live {
                self.remove_entry(&key);
                self.stats.record_expiration();
                removed += 1;
                debug!("Expired key '{}'", key);
            }
        }

        if removed > 0 {
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    fn evict_overflow(&mut self) {
        while self.entries.len() > self.max_entries {
            let Some(oldest) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&oldest) {
                self.forget_deadline(&entry);
            }
            self.stats.record_eviction();
            debug!("Evicted least recently used key '{}'", oldest);
        }
    }

    // Drops an entry together with its recency slot.
    fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.lru.remove(key);
                self.forget_deadline(&entry);
                true
            }
            None => false,
        }
    }

    fn forget_deadline(&mut self, entry: &CacheEntry) {
        if entry.expires_at.is_some() {
            self.scheduled -= 1;
        }
    }

    #[cfg(test)]
    pub(crate) fn scheduled_entries(&self) -> usize {
        self.scheduled
    }

    #[cfg(test)]
    pub(crate) fn expiration_of(&self, key: &str) -> Option<u64> {
        self.entries.get(key).and_then(|entry| entry.expires_at)
    }

    #[cfg(test)]
    pub(crate) fn lru_candidate(&self) -> Option<&str> {
        self.lru.peek_oldest()
    }
}
