//! No-Op Cache Repository
//!
//! Discards every write, so call sites can disable caching without
//! branching. Lives at the repository level rather than as an item variant:
//! a discarded value must not occupy a map slot, so `size` stays 0 for any
//! sequence of operations.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::error::Result;
use crate::expiry::TtlOverride;
use crate::repository::CacheStats;

// == No-Op Cache Repository ==
/// A repository that stores nothing: every get misses, every set is
/// discarded, `size` is always 0.
#[derive(Debug, Clone, Default)]
pub struct NoopCacheRepository<V> {
    name: String,
    _value: PhantomData<V>,
}

impl<V> NoopCacheRepository<V> {
    /// Creates a discard-everything repository.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _value: PhantomData,
        }
    }

    /// The repository name, used for diagnostics only.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Always a miss.
    pub fn get(&mut self, _key: &str) -> Option<V> {
        None
    }

    /// Async form of [`get`](NoopCacheRepository::get).
    pub async fn get_async(&mut self, _key: &str) -> Option<V> {
        None
    }

    /// Discards the value, returning it unchanged for call chaining.
    pub fn set(&mut self, _key: String, value: V, _ttl: Option<TtlOverride>) -> Result<V> {
        Ok(value)
    }

    /// Async form of [`set`](NoopCacheRepository::set).
    pub async fn set_async(&mut self, _key: String, value: V, _ttl: Option<TtlOverride>) -> Result<V> {
        Ok(value)
    }

    /// No-op.
    pub fn delete(&mut self, _key: &str) {}

    /// Async form of [`delete`](NoopCacheRepository::delete).
    pub async fn delete_async(&mut self, _key: &str) {}

    /// No-op.
    pub fn clear(&mut self) {}

    /// Async form of [`clear`](NoopCacheRepository::clear).
    pub async fn clear_async(&mut self) {}

    /// Nothing is ever held, so nothing ever expires.
    pub fn clear_expired_items(&mut self) -> usize {
        0
    }

    /// Async form of
    /// [`clear_expired_items`](NoopCacheRepository::clear_expired_items).
    pub async fn clear_expired_items_async(&mut self) -> usize {
        0
    }

    /// Always 0.
    pub fn size(&self) -> usize {
        0
    }

    /// Always true.
    pub fn is_empty(&self) -> bool {
        true
    }

    /// Always empty.
    pub fn snapshot(&self) -> HashMap<String, V> {
        HashMap::new()
    }

    /// Always zeroed.
    pub fn stats(&self) -> CacheStats {
        CacheStats::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_discards_everything() {
        let mut repo: NoopCacheRepository<String> = NoopCacheRepository::new("disabled");

        let stored = repo.set("key".to_string(), "value".to_string(), None).unwrap();
        assert_eq!(stored, "value");

        assert_eq!(repo.get("key"), None);
        assert_eq!(repo.size(), 0);
        assert!(repo.is_empty());
        assert!(repo.snapshot().is_empty());
    }

    #[test]
    fn test_noop_delete_and_clear_are_noops() {
        let mut repo: NoopCacheRepository<u32> = NoopCacheRepository::new("disabled");

        repo.delete("key");
        repo.clear();
        assert_eq!(repo.clear_expired_items(), 0);
        assert_eq!(repo.size(), 0);
    }

    #[tokio::test]
    async fn test_noop_async_surface() {
        let mut repo: NoopCacheRepository<u32> = NoopCacheRepository::new("disabled");

        repo.set_async("key".to_string(), 1, None).await.unwrap();
        assert_eq!(repo.get_async("key").await, None);

        repo.delete_async("key").await;
        repo.clear_async().await;
        assert_eq!(repo.clear_expired_items_async().await, 0);
        assert_eq!(repo.size(), 0);
    }
}
