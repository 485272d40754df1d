//! Tiered Cache - a pluggable key-value cache
//!
//! A single policy engine (expiration computation, sweeping, item lifecycle)
//! layered over interchangeable storage backends: in-memory, file-backed, a
//! two-tier composite, and a no-op stand-in for disabling caching.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tiered_cache::{MemoryCacheRepository, RepositoryConfig, TtlOverride};
//!
//! let config = RepositoryConfig::named("sessions")
//!     .with_sliding_window(Duration::from_secs(60))
//!     .with_auto_sweep(false);
//! let mut cache = MemoryCacheRepository::in_memory(config);
//!
//! cache.set("user:1".to_string(), "alice".to_string(), None).unwrap();
//! assert_eq!(cache.get("user:1"), Some("alice".to_string()));
//!
//! cache.set(
//!     "token".to_string(),
//!     "t".to_string(),
//!     Some(TtlOverride::Sliding(Duration::from_millis(50))),
//! ).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod expiry;
pub mod item;
pub mod repository;
pub mod storage;
pub mod tasks;

pub use config::{RepositoryConfig, DEFAULT_SLIDING_WINDOW, DEFAULT_SWEEP_INTERVAL};
pub use error::{CacheError, Result};
pub use expiry::TtlOverride;
pub use item::{CacheItem, CompositeCacheItem, FileCacheItem, MemoryCacheItem};
pub use repository::{
    CacheBackend, CacheRepository, CacheStats, CompositeBackend, CompositeCacheRepository,
    FileBackend, FileCacheRepository, MemoryBackend, MemoryCacheRepository, NoopCacheRepository,
    SharedCacheRepository, DEFAULT_DURABLE_TTL_OFFSET,
};
pub use storage::{StoragePathProvider, TempDirProvider};
pub use tasks::spawn_sweep_task;
