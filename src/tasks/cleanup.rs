//! Expiration Sweep Task
//!
//! Background task that periodically removes expired cache entries and
//! compacts the expiration queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps the cache every `interval`.
///
/// Expiration already happens lazily on every `set` and `get`; the sweep
/// additionally frees entries nobody asks for anymore and drops stale
/// expiration references left behind by overwrites and deletes.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheStore::new(1000)));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<RwLock<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiration sweep with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let (expired, compacted, pending) = {
                let mut cache_guard = cache.write().await;
                let (expired, compacted) = cache_guard.sweep();
                (expired, compacted, cache_guard.pending_expirations())
            };

            if expired > 0 || compacted > 0 {
                info!(
                    "Expiration sweep: removed {} expired entries, dropped {} stale expirations, {} still queued",
                    expired, compacted, pending
                );
            } else {
                debug!("Expiration sweep: nothing to do");
            }
        }
    })
}
