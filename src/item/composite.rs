//! Composite (Two-Tier) Cache Item
//!
//! Owns one in-memory item and one file-backed item under the same key.
//!
//! Writes go through both tiers, memory first. Reads hit the memory tier and
//! only fall through to the durable tier on a miss. The durable tier gets a
//! later deadline than the nominal expiration, so a value evicted or expired
//! from memory can still be served from the fallback for a grace window.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::item::{CacheItem, FileCacheItem, MemoryCacheItem};

// == Composite Cache Item ==
/// Two-tier storage: fast volatile memory in front of a slower durable
/// file slot.
#[derive(Debug)]
pub struct CompositeCacheItem<V> {
    memory: MemoryCacheItem<V>,
    file: FileCacheItem<V>,
    durable_offset_ms: u64,
}

impl<V> CompositeCacheItem<V> {
    /// Creates a composite item for `key` with a resolved nominal
    /// expiration. The durable tier backed by `path` expires
    /// `durable_offset` later than the nominal deadline.
    pub fn new(
        key: &str,
        expires_at: Option<u64>,
        path: PathBuf,
        durable_offset: Duration,
    ) -> Self {
        let durable_offset_ms = durable_offset.as_millis() as u64;
        Self {
            memory: MemoryCacheItem::new(key, expires_at),
            file: FileCacheItem::new(key, offset_deadline(expires_at, durable_offset_ms), path),
            durable_offset_ms,
        }
    }
}

/// Pushes a deadline later by the durable-tier offset. A never-expiring
/// deadline stays never-expiring.
fn offset_deadline(expires_at: Option<u64>, offset_ms: u64) -> Option<u64> {
    expires_at.map(|at| at + offset_ms)
}

#[async_trait]
impl<V> CacheItem<V> for CompositeCacheItem<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    fn key(&self) -> &str {
        self.memory.key()
    }

    fn expires_at(&self) -> Option<u64> {
        self.memory.expires_at()
    }

    fn set_expires_at(&mut self, expires_at: Option<u64>) {
        self.memory.set_expires_at(expires_at);
        self.file
            .set_expires_at(offset_deadline(expires_at, self.durable_offset_ms));
    }

    fn get(&self) -> Option<V> {
        match self.memory.get() {
            Some(value) => Some(value),
            None => self.file.get(),
        }
    }

    async fn get_async(&self) -> Option<V> {
        match self.memory.get() {
            Some(value) => Some(value),
            None => self.file.get_async().await,
        }
    }

    fn set(&mut self, value: V) -> Result<()> {
        // Memory first; a durable write failure leaves the tiers
        // inconsistent until the next delete or expiration.
        self.memory.set(value.clone())?;
        self.file.set(value)
    }

    async fn set_async(&mut self, value: V) -> Result<()> {
        self.memory.set(value.clone())?;
        self.file.set_async(value).await
    }

    fn delete(&mut self) {
        self.memory.delete();
        self.file.delete();
    }

    async fn delete_async(&mut self) {
        self.memory.delete();
        self.file.delete_async().await;
    }

    /// The composite outlives its memory tier: it only counts as expired
    /// once the durable grace window has elapsed as well, so the sweep does
    /// not destroy a fallback that can still serve reads.
    fn is_expired(&self) -> bool {
        self.memory.is_expired() && self.file.is_expired()
    }
}
