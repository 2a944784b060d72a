//! Shared server state
//!
//! The one cache instance every connection works against.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::CacheStore;
use crate::config::Config;

/// State shared across all connections.
///
/// Contains the cache store wrapped in Arc<RwLock<>> for thread-safe access.
/// Every command takes the write lock, since even a `get` updates recency
/// order and may expire entries.
#[derive(Clone)]
pub struct ServerState {
    /// Thread-safe cache store
    pub cache: Arc<RwLock<CacheStore>>,
    /// Largest command line or payload a client may send
    pub max_message_size: usize,
}

impl ServerState {
    /// Creates a new ServerState around the given cache store.
    pub fn new(cache: CacheStore, max_message_size: usize) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            max_message_size,
        }
    }

    /// Creates a new ServerState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::new(config.max_entries), config.max_message_size)
    }
}
