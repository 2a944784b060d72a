//! Expiration Queue Module
//!
//! Time-ordered index of scheduled expirations, used to find the next entry
//! due to expire without scanning the whole cache.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::cache::entry::NANOS_PER_SEC;

// == Expiration Queue ==
/// Min-heap of `(deadline, key)` pairs plus the set of outstanding deadlines.
///
/// The queue does not know whether a key is still live. Entries that were
/// overwritten or deleted stay in the heap until they are popped or compacted
/// away, and callers must check liveness against the store.
#[derive(Debug, Default)]
pub struct ExpirationQueue {
    /// Scheduled expirations, earliest deadline on top
    heap: BinaryHeap<Reverse<(u64, String)>>,
    /// Deadlines currently present in the heap
    deadlines: HashSet<u64>,
}

impl ExpirationQueue {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Schedule ==
    /// Schedules `key` to expire `ttl_secs` seconds after `now`.
    ///
    /// The returned deadline is unique among outstanding deadlines: on a
    /// collision it is bumped one nanosecond at a time until free. Returns
    /// None when the deadline does not fit the clock, in which case nothing
    /// is scheduled and the entry should never expire.
    pub fn schedule(&mut self, key: &str, now: u64, ttl_secs: u64) -> Option<u64> {
        let mut deadline = ttl_secs
            .checked_mul(NANOS_PER_SEC)
            .and_then(|ttl| now.checked_add(ttl))?;

        while self.deadlines.contains(&deadline) {
            deadline = deadline.checked_add(1)?;
        }

        self.deadlines.insert(deadline);
        self.heap.push(Reverse((deadline, key.to_string())));
        Some(deadline)
    }

    // == Peek ==
    /// Returns the earliest scheduled deadline.
    pub fn peek_deadline(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse((deadline, _))| *deadline)
    }

    // == Pop Due ==
    /// Pops the earliest expiration if it is due at `now`.
    ///
    /// Returns None once the queue is empty or its head lies in the future;
    /// since the heap is ordered, nothing behind the head is due either.
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, String)> {
        if self.peek_deadline()? > now {
            return None;
        }

        let Reverse((deadline, key)) = self.heap.pop()?;
        self.deadlines.remove(&deadline);
        Some((deadline, key))
    }

    // == Retain ==
    /// Keeps only the expirations for which `keep` returns true.
    ///
    /// Returns the number of expirations dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(u64, &str) -> bool,
    {
        let before = self.heap.len();
        self.heap
            .retain(|Reverse((deadline, key))| keep(*deadline, key.as_str()));
        self.deadlines = self
            .heap
            .iter()
            .map(|Reverse((deadline, _))| *deadline)
            .collect();
        before - self.heap.len()
    }

    /// Returns true if `deadline` is currently scheduled.
    #[cfg(test)]
    pub fn contains_deadline(&self, deadline: u64) -> bool {
        self.deadlines.contains(&deadline)
    }

    // == Length ==
    /// Number of scheduled expirations, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
