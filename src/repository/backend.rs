//! Cache Backend Module
//!
//! The factory-and-hooks contract that plugs a storage flavor into the
//! repository engine, plus the built-in backends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::item::{CacheItem, CompositeCacheItem, FileCacheItem, MemoryCacheItem};
use crate::storage::{StoragePathProvider, TempDirProvider};

/// Default grace window by which the composite durable tier outlives the
/// nominal expiration.
pub const DEFAULT_DURABLE_TTL_OFFSET: Duration = Duration::from_millis(2000);

// == Cache Backend Contract ==
/// Constructs items for a repository and optionally observes its mutations.
///
/// `construct_item` is the only mandatory capability. The observer hooks
/// default to no-ops; the engine invokes them after the corresponding
/// storage mutation completes and never depends on them for correctness.
#[async_trait]
pub trait CacheBackend<V>: Send + Sync {
    /// The item flavor this backend stores values in.
    type Item: CacheItem<V> + 'static;

    /// Creates an empty item for `key` with a resolved expiration.
    fn construct_item(&self, key: &str, expires_at: Option<u64>) -> Self::Item;

    /// Observes a completed write.
    fn on_set(&self, _key: &str) {}

    /// Observes a completed delete.
    fn on_delete(&self, _key: &str) {}

    /// Observes a completed clear.
    fn on_clear(&self) {}

    /// Async form of [`on_set`](CacheBackend::on_set).
    async fn on_set_async(&self, _key: &str) {}

    /// Async form of [`on_delete`](CacheBackend::on_delete).
    async fn on_delete_async(&self, _key: &str) {}

    /// Async form of [`on_clear`](CacheBackend::on_clear).
    async fn on_clear_async(&self) {}
}

// == Memory Backend ==
/// Stores every value in process memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBackend;

#[async_trait]
impl<V> CacheBackend<V> for MemoryBackend
where
    V: Clone + Send + Sync + 'static,
{
    type Item = MemoryCacheItem<V>;

    fn construct_item(&self, key: &str, expires_at: Option<u64>) -> Self::Item {
        MemoryCacheItem::new(key, expires_at)
    }
}

// == File Backend ==
/// Stores every value in its own file under the provider's root.
#[derive(Clone)]
pub struct FileBackend {
    provider: Arc<dyn StoragePathProvider>,
}

impl FileBackend {
    /// Creates a backend allocating slots from the OS temp directory.
    pub fn new() -> Self {
        Self::with_provider(Arc::new(TempDirProvider::new()))
    }

    /// Creates a backend allocating slots from the given provider.
    pub fn with_provider(provider: Arc<dyn StoragePathProvider>) -> Self {
        Self { provider }
    }
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> CacheBackend<V> for FileBackend
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type Item = FileCacheItem<V>;

    fn construct_item(&self, key: &str, expires_at: Option<u64>) -> Self::Item {
        FileCacheItem::new(key, expires_at, self.provider.slot_path(key))
    }
}

// == Composite Backend ==
/// Stores every value in a memory tier backed by a longer-lived file tier.
#[derive(Clone)]
pub struct CompositeBackend {
    provider: Arc<dyn StoragePathProvider>,
    durable_ttl_offset: Duration,
}

impl CompositeBackend {
    /// Creates a backend with the default durable grace window and slots
    /// from the OS temp directory.
    pub fn new() -> Self {
        Self::with_options(Arc::new(TempDirProvider::new()), DEFAULT_DURABLE_TTL_OFFSET)
    }

    /// Creates a backend with an explicit slot provider and durable grace
    /// window.
    pub fn with_options(
        provider: Arc<dyn StoragePathProvider>,
        durable_ttl_offset: Duration,
    ) -> Self {
        Self {
            provider,
            durable_ttl_offset,
        }
    }
}

impl Default for CompositeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> CacheBackend<V> for CompositeBackend
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type Item = CompositeCacheItem<V>;

    fn construct_item(&self, key: &str, expires_at: Option<u64>) -> Self::Item {
        CompositeCacheItem::new(
            key,
            expires_at,
            self.provider.slot_path(key),
            self.durable_ttl_offset,
        )
    }
}
