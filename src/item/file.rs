//! File-Backed Cache Item
//!
//! Persists one value per item as JSON in a single backing file.
//!
//! Write failures propagate to the caller. Read and delete failures are
//! swallowed and logged at debug level: the cache is advisory, so a failed
//! read must look exactly like a miss.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::item::CacheItem;

// == File Cache Item ==
/// Durable storage: the value survives in the filesystem until deleted or
/// expired. The backing path is allocated once by the storage provider and
/// reused for the item's lifetime; the file only exists after the first
/// write.
#[derive(Debug)]
pub struct FileCacheItem<V> {
    key: String,
    expires_at: Option<u64>,
    path: PathBuf,
    _value: PhantomData<V>,
}

impl<V> FileCacheItem<V> {
    /// Creates an item for `key` backed by `path`, with a resolved
    /// expiration.
    pub fn new(key: &str, expires_at: Option<u64>, path: PathBuf) -> Self {
        Self {
            key: key.to_string(),
            expires_at,
            path,
            _value: PhantomData,
        }
    }

    /// The backing file path owned by this item.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<V> FileCacheItem<V>
where
    V: DeserializeOwned,
{
    fn decode(&self, bytes: &[u8]) -> Option<V> {
        match serde_json::from_slice(bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(
                    key = %self.key,
                    path = %self.path.display(),
                    error = %err,
                    "Suppressed cache file decode failure"
                );
                None
            }
        }
    }
}

impl<V> FileCacheItem<V>
where
    V: Serialize,
{
    fn encode(&self, value: &V) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|source| CacheError::Encode {
            key: self.key.clone(),
            source,
        })
    }

    fn write_error(&self, source: std::io::Error) -> CacheError {
        CacheError::StorageWrite {
            key: self.key.clone(),
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl<V> CacheItem<V> for FileCacheItem<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync,
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
        match std::fs::read(&self.path) {
            Ok(bytes) => self.decode(&bytes),
            Err(err) => {
                debug!(
                    key = %self.key,
                    path = %self.path.display(),
                    error = %err,
                    "Suppressed cache file read failure"
                );
                None
            }
        }
    }

    async fn get_async(&self) -> Option<V> {
        if self.is_expired() {
            return None;
        }
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => self.decode(&bytes),
            Err(err) => {
                debug!(
                    key = %self.key,
                    path = %self.path.display(),
                    error = %err,
                    "Suppressed cache file read failure"
                );
                None
            }
        }
    }

    fn set(&mut self, value: V) -> Result<()> {
        let bytes = self.encode(&value)?;
        std::fs::write(&self.path, bytes).map_err(|err| self.write_error(err))
    }

    async fn set_async(&mut self, value: V) -> Result<()> {
        let bytes = self.encode(&value)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|err| self.write_error(err))
    }

    fn delete(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            debug!(
                key = %self.key,
                path = %self.path.display(),
                error = %err,
                "Suppressed cache file delete failure"
            );
        }
    }

    async fn delete_async(&mut self) {
        if let Err(err) = tokio::fs::remove_file(&self.path).await {
            debug!(
                key = %self.key,
                path = %self.path.display(),
                error = %err,
                "Suppressed cache file delete failure"
            );
        }
    }
}
