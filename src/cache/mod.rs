//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod expiry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, StoreClock, NANOS_PER_SEC};
pub(crate) use expiry::ExpirationQueue;
pub(crate) use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
