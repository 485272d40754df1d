//! Cache Repository Module
//!
//! The policy engine: owns the key→item mapping, resolves expirations on
//! every write, sweeps expired items inline on every read and on a timer,
//! and invokes backend hooks after each mutation.
//!
//! Storage flavor is pluggable through [`CacheBackend`]; backend-specific
//! repositories differ only in which item variant they construct.

pub mod backend;
pub mod noop;
pub mod shared;
pub mod stats;


pub use backend::{
    CacheBackend, CompositeBackend, FileBackend, MemoryBackend, DEFAULT_DURABLE_TTL_OFFSET,
};
pub use noop::NoopCacheRepository;
pub use shared::SharedCacheRepository;
pub use stats::CacheStats;

use std::collections::HashMap;
use std::marker::PhantomData;

use tracing::debug;

use crate::config::RepositoryConfig;
use crate::error::Result;
use crate::expiry::{now_ms, resolve_expires_at, TtlOverride};
use crate::item::CacheItem;

// == Repository Type Aliases ==
/// Repository storing every value in process memory.
pub type MemoryCacheRepository<V> = CacheRepository<MemoryBackend, V>;
/// Repository storing every value in its own backing file.
pub type FileCacheRepository<V> = CacheRepository<FileBackend, V>;
/// Repository storing every value in a memory tier with a durable fallback.
pub type CompositeCacheRepository<V> = CacheRepository<CompositeBackend, V>;

// == Cache Repository ==
/// One named cache instance: a key→item mapping plus expiration policy.
///
/// The engine is single-owner (`&mut self`); callers serialize access. For
/// shared ownership with a background sweep, wrap it in
/// [`SharedCacheRepository`].
pub struct CacheRepository<B, V>
where
    B: CacheBackend<V>,
{
    config: RepositoryConfig,
    backend: B,
    items: HashMap<String, B::Item>,
    stats: CacheStats,
    _value: PhantomData<V>,
}

impl<B, V> CacheRepository<B, V>
where
    B: CacheBackend<V>,
    V: Clone + Send + Sync,
{
    // == Constructor ==
    /// Creates a repository storing items constructed by `backend`.
    pub fn new(config: RepositoryConfig, backend: B) -> Self {
        debug!(
            repository = %config.name,
            auto_sweep = config.auto_sweep,
            sweep_interval_ms = config.sweep_interval.as_millis() as u64,
            "Constructed cache repository"
        );
        Self {
            config,
            backend,
            items: HashMap::new(),
            stats: CacheStats::new(),
            _value: PhantomData,
        }
    }

    /// The repository name, used for diagnostics only.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// This repository's configuration.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Sweeps expired items first, so a caller never observes an expired
    /// value even between timer ticks. Absence is not an error.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.clear_expired_items();
        match self.items.get(key).and_then(|item| item.get()) {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Async form of [`get`](CacheRepository::get).
    pub async fn get_async(&mut self, key: &str) -> Option<V> {
        self.clear_expired_items_async().await;
        let value = match self.items.get(key) {
            Some(item) => item.get_async().await,
            None => None,
        };
        match value {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a value under `key`, resolving the effective expiration once
    /// at the moment of the call.
    ///
    /// An existing item is updated in place (deadline recomputed, value
    /// replaced); otherwise the backend constructs a fresh item. Returns the
    /// stored value unchanged for call chaining. Underlying storage write
    /// failures propagate.
    pub fn set(&mut self, key: String, value: V, ttl: Option<TtlOverride>) -> Result<V> {
        let expires_at = resolve_expires_at(now_ms(), ttl, &self.config);

        if let Some(item) = self.items.get_mut(&key) {
            item.set_expires_at(expires_at);
            item.set(value.clone())?;
            debug!(repository = %self.config.name, key = %key, "Updated cache item");
        } else {
            let mut item = self.backend.construct_item(&key, expires_at);
            item.set(value.clone())?;
            self.items.insert(key.clone(), item);
            debug!(repository = %self.config.name, key = %key, "Created cache item");
        }

        self.stats.set_total_entries(self.items.len());
        self.backend.on_set(&key);
        Ok(value)
    }

    /// Async form of [`set`](CacheRepository::set).
    pub async fn set_async(&mut self, key: String, value: V, ttl: Option<TtlOverride>) -> Result<V> {
        let expires_at = resolve_expires_at(now_ms(), ttl, &self.config);

        if let Some(item) = self.items.get_mut(&key) {
            item.set_expires_at(expires_at);
            item.set_async(value.clone()).await?;
            debug!(repository = %self.config.name, key = %key, "Updated cache item");
        } else {
            let mut item = self.backend.construct_item(&key, expires_at);
            item.set_async(value.clone()).await?;
            self.items.insert(key.clone(), item);
            debug!(repository = %self.config.name, key = %key, "Created cache item");
        }

        self.stats.set_total_entries(self.items.len());
        self.backend.on_set_async(&key).await;
        Ok(value)
    }

    // == Delete ==
    /// Releases and removes an item. No-op for an absent key.
    pub fn delete(&mut self, key: &str) {
        if let Some(mut item) = self.items.remove(key) {
            item.delete();
            self.stats.set_total_entries(self.items.len());
            self.backend.on_delete(key);
            debug!(repository = %self.config.name, key = %key, "Deleted cache item");
        }
    }

    /// Async form of [`delete`](CacheRepository::delete).
    pub async fn delete_async(&mut self, key: &str) {
        if let Some(mut item) = self.items.remove(key) {
            item.delete_async().await;
            self.stats.set_total_entries(self.items.len());
            self.backend.on_delete_async(key).await;
            debug!(repository = %self.config.name, key = %key, "Deleted cache item");
        }
    }

    // == Clear ==
    /// Releases and removes every item.
    pub fn clear(&mut self) {
        for (_, mut item) in self.items.drain() {
            item.delete();
        }
        self.stats.set_total_entries(0);
        self.backend.on_clear();
        debug!(repository = %self.config.name, "Cleared cache repository");
    }

    /// Async form of [`clear`](CacheRepository::clear).
    pub async fn clear_async(&mut self) {
        let drained: Vec<(String, B::Item)> = self.items.drain().collect();
        for (_, mut item) in drained {
            item.delete_async().await;
        }
        self.stats.set_total_entries(0);
        self.backend.on_clear_async().await;
        debug!(repository = %self.config.name, "Cleared cache repository");
    }

    // == Sweep ==
    /// Removes all expired items in one full pass.
    ///
    /// Runs on the background timer and inline at the start of every get.
    /// Returns the number of items removed.
    pub fn clear_expired_items(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .items
            .iter()
            .filter(|(_, item)| item.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            if let Some(mut item) = self.items.remove(&key) {
                item.on_expired();
                debug!(repository = %self.config.name, key = %key, "Swept expired cache item");
            }
        }

        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.items.len());
        count
    }

    /// Async form of
    /// [`clear_expired_items`](CacheRepository::clear_expired_items).
    pub async fn clear_expired_items_async(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .items
            .iter()
            .filter(|(_, item)| item.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            if let Some(mut item) = self.items.remove(&key) {
                item.on_expired_async().await;
                debug!(repository = %self.config.name, key = %key, "Swept expired cache item");
            }
        }

        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.items.len());
        count
    }

    // == Introspection ==
    /// Returns the current number of items, without sweeping.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the repository holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Materializes a key→value mapping of all currently-held items,
    /// without sweeping. Items whose storage yields absence are omitted.
    pub fn snapshot(&self) -> HashMap<String, V> {
        self.items
            .iter()
            .filter_map(|(key, item)| item.get().map(|value| (key.clone(), value)))
            .collect()
    }

    /// Returns current repository statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.items.len());
        stats
    }
}

// == Backend-Specific Constructors ==
impl<V> CacheRepository<MemoryBackend, V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a repository holding every value in process memory.
    pub fn in_memory(config: RepositoryConfig) -> Self {
        Self::new(config, MemoryBackend)
    }
}

impl<V> CacheRepository<FileBackend, V>
where
    V: Clone + serde::Serialize + serde::de::DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a repository persisting every value to its own file under
    /// the OS temp directory.
    pub fn file_backed(config: RepositoryConfig) -> Self {
        Self::new(config, FileBackend::new())
    }
}

impl<V> CacheRepository<CompositeBackend, V>
where
    V: Clone + serde::Serialize + serde::de::DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a two-tier repository with the default durable grace window.
    pub fn two_tier(config: RepositoryConfig) -> Self {
        Self::new(config, CompositeBackend::new())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::MemoryCacheItem;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread::sleep;
    use std::time::Duration;

    fn repo(config: RepositoryConfig) -> MemoryCacheRepository<String> {
        CacheRepository::in_memory(config)
    }

    fn no_expiry_config() -> RepositoryConfig {
        RepositoryConfig::named("test").without_sliding_window()
    }

    #[test]
    fn test_repository_new() {
        let repo = repo(no_expiry_config());
        assert_eq!(repo.name(), "test");
        assert_eq!(repo.size(), 0);
        assert!(repo.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut repo = repo(no_expiry_config());

        repo.set("key1".to_string(), "value1".to_string(), None).unwrap();

        assert_eq!(repo.get("key1"), Some("value1".to_string()));
        assert_eq!(repo.size(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let mut repo = repo(no_expiry_config());
        assert_eq!(repo.get("nonexistent"), None);
    }

    #[test]
    fn test_set_returns_value_for_chaining() {
        let mut repo = repo(no_expiry_config());
        let stored = repo.set("key1".to_string(), "value1".to_string(), None).unwrap();
        assert_eq!(stored, "value1");
    }

    #[test]
    fn test_delete() {
        let mut repo = repo(no_expiry_config());

        repo.set("key1".to_string(), "value1".to_string(), None).unwrap();
        repo.delete("key1");

        assert!(repo.is_empty());
        assert_eq!(repo.get("key1"), None);
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let mut repo = repo(no_expiry_config());
        repo.delete("nonexistent");
        assert!(repo.is_empty());
    }

    #[test]
    fn test_overwrite_updates_in_place() {
        let mut repo = repo(no_expiry_config());

        repo.set("key1".to_string(), "value1".to_string(), None).unwrap();
        repo.set("key1".to_string(), "value2".to_string(), None).unwrap();

        assert_eq!(repo.get("key1"), Some("value2".to_string()));
        assert_eq!(repo.size(), 1);
    }

    #[test]
    fn test_get_sweeps_expired_items_inline() {
        let mut repo = repo(no_expiry_config());

        repo.set(
            "short".to_string(),
            "value".to_string(),
            Some(TtlOverride::Sliding(Duration::from_millis(30))),
        )
        .unwrap();

        assert_eq!(repo.get("short"), Some("value".to_string()));

        sleep(Duration::from_millis(60));

        // No timer is running here; the inline sweep must remove it.
        assert_eq!(repo.get("short"), None);
        assert_eq!(repo.size(), 0);
    }

    #[test]
    fn test_ttl_recomputed_on_overwrite() {
        let mut repo = repo(no_expiry_config());

        repo.set(
            "key".to_string(),
            "v1".to_string(),
            Some(TtlOverride::Sliding(Duration::from_millis(40))),
        )
        .unwrap();

        sleep(Duration::from_millis(25));

        // The overwrite resets the deadline from this moment.
        repo.set(
            "key".to_string(),
            "v2".to_string(),
            Some(TtlOverride::Sliding(Duration::from_millis(60))),
        )
        .unwrap();

        sleep(Duration::from_millis(30));

        assert_eq!(repo.get("key"), Some("v2".to_string()));
    }

    #[test]
    fn test_clear() {
        let mut repo = repo(no_expiry_config());

        repo.set("key1".to_string(), "v1".to_string(), None).unwrap();
        repo.set("key2".to_string(), "v2".to_string(), None).unwrap();
        repo.clear();

        assert_eq!(repo.size(), 0);
        assert_eq!(repo.get("key1"), None);
        assert_eq!(repo.get("key2"), None);
    }

    #[test]
    fn test_clear_expired_items_counts_removals() {
        let mut repo = repo(no_expiry_config());

        repo.set(
            "short".to_string(),
            "v".to_string(),
            Some(TtlOverride::Sliding(Duration::from_millis(30))),
        )
        .unwrap();
        repo.set("long".to_string(), "v".to_string(), None).unwrap();

        sleep(Duration::from_millis(60));

        let removed = repo.clear_expired_items();
        assert_eq!(removed, 1);
        assert_eq!(repo.size(), 1);
        assert_eq!(repo.get("long"), Some("v".to_string()));
    }

    #[test]
    fn test_snapshot_does_not_sweep() {
        let mut repo = repo(no_expiry_config());

        repo.set(
            "short".to_string(),
            "v".to_string(),
            Some(TtlOverride::Sliding(Duration::from_millis(30))),
        )
        .unwrap();
        repo.set("long".to_string(), "w".to_string(), None).unwrap();

        sleep(Duration::from_millis(60));

        let snapshot = repo.snapshot();
        // The expired item reads as absent but is still held in the map.
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("long"), Some(&"w".to_string()));
        assert_eq!(repo.size(), 2);
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let mut repo = repo(no_expiry_config());

        repo.set("key1".to_string(), "v".to_string(), None).unwrap();
        repo.get("key1");
        repo.get("nonexistent");

        let stats = repo.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_async_roundtrip() {
        let mut repo = repo(no_expiry_config());

        repo.set_async("key1".to_string(), "v".to_string(), None)
            .await
            .unwrap();
        assert_eq!(repo.get_async("key1").await, Some("v".to_string()));

        repo.delete_async("key1").await;
        assert_eq!(repo.get_async("key1").await, None);

        repo.set_async("key2".to_string(), "w".to_string(), None)
            .await
            .unwrap();
        repo.clear_async().await;
        assert!(repo.is_empty());
    }

    // == Hook Tests ==

    #[derive(Clone, Default)]
    struct CountingBackend {
        sets: Arc<AtomicUsize>,
        deletes: Arc<AtomicUsize>,
        clears: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl CacheBackend<String> for CountingBackend {
        type Item = MemoryCacheItem<String>;

        fn construct_item(&self, key: &str, expires_at: Option<u64>) -> Self::Item {
            MemoryCacheItem::new(key, expires_at)
        }

        fn on_set(&self, _key: &str) {
            self.sets.fetch_add(1, Ordering::SeqCst);
        }

        fn on_delete(&self, _key: &str) {
            self.deletes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_clear(&self) {
            self.clears.fetch_add(1, Ordering::SeqCst);
        }

        async fn on_set_async(&self, key: &str) {
            self.on_set(key);
        }

        async fn on_delete_async(&self, key: &str) {
            self.on_delete(key);
        }

        async fn on_clear_async(&self) {
            self.on_clear();
        }
    }

    #[test]
    fn test_hooks_fire_after_mutations() {
        let backend = CountingBackend::default();
        let mut repo = CacheRepository::new(no_expiry_config(), backend.clone());

        repo.set("k".to_string(), "v".to_string(), None).unwrap();
        repo.set("k".to_string(), "w".to_string(), None).unwrap();
        repo.delete("k");
        repo.clear();

        assert_eq!(backend.sets.load(Ordering::SeqCst), 2);
        assert_eq!(backend.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(backend.clears.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delete_hook_skipped_for_absent_key() {
        let backend = CountingBackend::default();
        let mut repo = CacheRepository::new(no_expiry_config(), backend.clone());

        repo.delete("absent");

        assert_eq!(backend.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_async_hooks_fire() {
        let backend = CountingBackend::default();
        let mut repo = CacheRepository::new(no_expiry_config(), backend.clone());

        repo.set_async("k".to_string(), "v".to_string(), None)
            .await
            .unwrap();
        repo.delete_async("k").await;
        repo.clear_async().await;

        assert_eq!(backend.sets.load(Ordering::SeqCst), 1);
        assert_eq!(backend.deletes.load(Ordering::SeqCst), 1);
        assert_eq!(backend.clears.load(Ordering::SeqCst), 1);
    }
}
