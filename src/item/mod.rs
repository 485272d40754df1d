//! Cache Item Module
//!
//! The capability contract every storage adapter satisfies, plus the
//! in-memory, file-backed, and two-tier composite implementations.

mod composite;
mod file;
mod memory;

pub use composite::CompositeCacheItem;
pub use file::FileCacheItem;
pub use memory::MemoryCacheItem;

use async_trait::async_trait;

use crate::error::Result;
use crate::expiry::now_ms;

// == Cache Item Contract ==
/// One stored value under one key, with an absolute expiration.
///
/// Repositories construct items through their backend's factory and drive
/// them exclusively through this contract. Read and delete failures are
/// swallowed by the item and surface as absence; only writes may fail.
#[async_trait]
pub trait CacheItem<V>: Send + Sync {
    /// The key this item stores, unique within the owning repository.
    fn key(&self) -> &str;

    /// Absolute expiration in epoch milliseconds, None = never expires.
    fn expires_at(&self) -> Option<u64>;

    /// Replaces the expiration deadline, recomputed by the repository on
    /// every write to an existing key.
    fn set_expires_at(&mut self, expires_at: Option<u64>);

    /// Returns the stored value, or None on miss, expiry, or read failure.
    fn get(&self) -> Option<V>;

    /// Async form of [`get`](CacheItem::get); suspends at the storage
    /// boundary where the implementation does I/O.
    async fn get_async(&self) -> Option<V>;

    /// Persists a value into this item's storage.
    fn set(&mut self, value: V) -> Result<()>;

    /// Async form of [`set`](CacheItem::set).
    async fn set_async(&mut self, value: V) -> Result<()>;

    /// Releases this item's storage. Already-absent storage is not an error.
    fn delete(&mut self);

    /// Async form of [`delete`](CacheItem::delete).
    async fn delete_async(&mut self);

    /// Checks whether the item has expired.
    ///
    /// Boundary condition: an item is expired once the current time is
    /// greater than or equal to its deadline.
    fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires) => now_ms() >= expires,
            None => false,
        }
    }

    /// Invoked by the sweep when it finds this item expired.
    fn on_expired(&mut self) {
        self.delete();
    }

    /// Async form of [`on_expired`](CacheItem::on_expired).
    async fn on_expired_async(&mut self) {
        self.delete_async().await;
    }
}
