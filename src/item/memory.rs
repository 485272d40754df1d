//! In-Memory Cache Item
//!
//! Holds the value directly in the struct; no I/O on any path.

use async_trait::async_trait;

use crate::error::Result;
use crate::item::CacheItem;

// == Memory Cache Item ==
/// Fast, volatile storage: the value lives in process memory and is lost on
/// process exit.
#[derive(Debug, Clone)]
pub struct MemoryCacheItem<V> {
    key: String,
    expires_at: Option<u64>,
    value: Option<V>,
}

impl<V> MemoryCacheItem<V> {
    /// Creates an empty item for `key` with a resolved expiration.
    pub fn new(key: &str, expires_at: Option<u64>) -> Self {
        Self {
            key: key.to_string(),
            expires_at,
            value: None,
        }
    }
}

#[async_trait]
impl<V> CacheItem<V> for MemoryCacheItem<V>
where
    V: Clone + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn expires_at(&self) -> Option<u64> {
        self.expires_at
    }

    fn set_expires_at(&mut self, expires_at: Option<u64>) {
        self.expires_at = expires_at;
    }

    fn get(&self) -> Option<V> {
        if self.is_expired() {
            return None;
        }
        self.value.clone()
    }

    async fn get_async(&self) -> Option<V> {
        self.get()
    }

    fn set(&mut self, value: V) -> Result<()> {
        self.value = Some(value);
        Ok(())
    }

    async fn set_async(&mut self, value: V) -> Result<()> {
        self.set(value)
    }

    fn delete(&mut self) {
        self.value = None;
    }

    async fn delete_async(&mut self) {
        self.delete();
    }
}
