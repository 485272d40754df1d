//! Expiration Sweep Task
//!
//! Background task that periodically removes expired cache items.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::repository::{CacheBackend, CacheRepository};

/// Spawns a background task that sweeps a shared repository on a fixed
/// interval.
///
/// The task runs in an infinite loop, sleeping for `interval` between
/// passes and holding the write lock only for the duration of one pass.
/// The returned handle must be aborted when the repository is disposed so
/// no timer outlives its owner; [`SharedCacheRepository`] does this
/// automatically.
///
/// [`SharedCacheRepository`]: crate::repository::SharedCacheRepository
pub fn spawn_sweep_task<B, V>(
    repository: Arc<RwLock<CacheRepository<B, V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    B: CacheBackend<V> + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting expiration sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut repo = repository.write().await;
                repo.clear_expired_items_async().await
            };

            if removed > 0 {
                info!(removed, "Sweep removed expired cache items");
            } else {
                debug!("Sweep found no expired cache items");
            }
        }
    })
}
