//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Only the write path can fail: a silent write failure would create a false
//! impression of successful caching. Read and delete failures on the durable
//! tier are swallowed at the item level and surface as a plain miss.

use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value could not be serialized for the durable tier
    #[error("Failed to encode value for key '{key}': {source}")]
    Encode {
        /// The key whose value failed to encode
        key: String,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Durable tier write failed
    #[error("Failed to write cache file {path:?} for key '{key}': {source}")]
    StorageWrite {
        /// The key whose value failed to persist
        key: String,
        /// The backing file that could not be written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
