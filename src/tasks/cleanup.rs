//! Lifetime Sweep Task
//!
//! Background task that periodically drops expired entries from every store.
//! Reads already hide expired entries; the sweep only reclaims their memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep takes every store's write lock in turn, never
/// two at once.
///
/// # Arguments
/// * `cache` - shared reference to the entity cache
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: Arc<Cache>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    spawn_sweep(cache, Duration::from_secs(cleanup_interval_secs))
}

fn spawn_sweep(cache: Arc<Cache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting lifetime sweep with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();

            if removed > 0 {
                info!("Lifetime sweep: removed {} expired entries", removed);
            } else {
                debug!("Lifetime sweep: no expired entries found");
            }
        }
    })
}
