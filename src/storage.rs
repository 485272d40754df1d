//! Storage Slot Module
//!
//! Allocates backing file paths for durable cache items.
//!
//! Each durable item owns exactly one process-local slot, allocated once at
//! construction and reused for the item's lifetime. The file itself is not
//! created until the first write.

use std::env;
use std::path::PathBuf;

use uuid::Uuid;

// == Path Provider Contract ==
/// Allocates unique, process-local backing paths for durable cache items.
pub trait StoragePathProvider: Send + Sync {
    /// Returns a fresh slot path for an item storing `key`.
    ///
    /// Every call must yield a path no other live item is using.
    fn slot_path(&self, key: &str) -> PathBuf;
}

// == Temp Directory Provider ==
/// Default provider allocating slots under a root directory, the OS temp
/// directory unless overridden.
///
/// Slot names are random, so keys never need sanitizing into file names.
#[derive(Debug, Clone)]
pub struct TempDirProvider {
    root: PathBuf,
}

impl TempDirProvider {
    /// Creates a provider rooted at the OS temp directory.
    pub fn new() -> Self {
        Self {
            root: env::temp_dir(),
        }
    }

    /// Creates a provider rooted at the given directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for TempDirProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePathProvider for TempDirProvider {
    fn slot_path(&self, _key: &str) -> PathBuf {
        self.root.join(format!("cache-{}.json", Uuid::new_v4()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_paths_are_unique() {
        let provider = TempDirProvider::new();
        let a = provider.slot_path("same_key");
        let b = provider.slot_path("same_key");
        assert_ne!(a, b);
    }

    #[test]
    fn test_slots_land_under_root() {
        let provider = TempDirProvider::with_root("/tmp/cache-slots");
        let path = provider.slot_path("key");
        assert!(path.starts_with("/tmp/cache-slots"));
    }

    #[test]
    fn test_default_root_is_temp_dir() {
        let provider = TempDirProvider::default();
        let path = provider.slot_path("key");
        assert!(path.starts_with(env::temp_dir()));
    }
}
