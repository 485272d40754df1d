//! Shared Cache Repository
//!
//! `Arc<RwLock<_>>` wrapper owning the engine together with its background
//! sweep task. The task starts on construction when auto-sweep is enabled
//! and is aborted on [`shutdown`](SharedCacheRepository::shutdown) and on
//! drop, so no timer outlives the repository.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::Result;
use crate::expiry::TtlOverride;
use crate::repository::{CacheBackend, CacheRepository, CacheStats};
use crate::tasks::spawn_sweep_task;

// == Shared Cache Repository ==
/// A cache repository with shared ownership and an owned sweep timer.
///
/// Must be constructed inside a tokio runtime when the repository's
/// configuration enables auto-sweep.
pub struct SharedCacheRepository<B, V>
where
    B: CacheBackend<V>,
{
    inner: Arc<RwLock<CacheRepository<B, V>>>,
    sweeper: Option<JoinHandle<()>>,
}

impl<B, V> SharedCacheRepository<B, V>
where
    B: CacheBackend<V> + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Wraps an engine, starting the recurring sweep if the engine's
    /// configuration asks for one.
    pub fn new(repository: CacheRepository<B, V>) -> Self {
        let auto_sweep = repository.config().auto_sweep;
        let interval = repository.config().sweep_interval;

        let inner = Arc::new(RwLock::new(repository));
        let sweeper = auto_sweep.then(|| spawn_sweep_task(inner.clone(), interval));

        Self { inner, sweeper }
    }

    // == Delegated Operations ==
    /// See [`CacheRepository::get`].
    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.write().await.get_async(key).await
    }

    /// See [`CacheRepository::set`].
    pub async fn set(&self, key: String, value: V, ttl: Option<TtlOverride>) -> Result<V> {
        self.inner.write().await.set_async(key, value, ttl).await
    }

    /// See [`CacheRepository::delete`].
    pub async fn delete(&self, key: &str) {
        self.inner.write().await.delete_async(key).await
    }

    /// See [`CacheRepository::clear`].
    pub async fn clear(&self) {
        self.inner.write().await.clear_async().await
    }

    /// See [`CacheRepository::clear_expired_items`].
    pub async fn clear_expired_items(&self) -> usize {
        self.inner.write().await.clear_expired_items_async().await
    }

    /// See [`CacheRepository::size`].
    pub async fn size(&self) -> usize {
        self.inner.read().await.size()
    }

    /// See [`CacheRepository::is_empty`].
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// See [`CacheRepository::snapshot`].
    pub async fn snapshot(&self) -> HashMap<String, V> {
        self.inner.read().await.snapshot()
    }

    /// See [`CacheRepository::stats`].
    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    /// Shared handle to the underlying engine, for callers that need to
    /// batch operations under one lock acquisition.
    pub fn repository(&self) -> Arc<RwLock<CacheRepository<B, V>>> {
        self.inner.clone()
    }
}

impl<B, V> SharedCacheRepository<B, V>
where
    B: CacheBackend<V>,
{
    // == Disposal ==
    /// Cancels the background sweep. Idempotent; also invoked on drop.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
            debug!("Aborted cache sweep task");
        }
    }

    /// Whether a background sweep task is currently owned.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.is_some()
    }
}

impl<B, V> Drop for SharedCacheRepository<B, V>
where
    B: CacheBackend<V>,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
