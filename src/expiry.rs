//! Expiration Math Module
//!
//! Clock access and TTL resolution shared by all repositories.
//!
//! Expiration timestamps are absolute epoch milliseconds; `None` means the
//! item never expires. Resolution happens once per write, never on reads, so
//! a stored deadline is fixed at write time.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::RepositoryConfig;

// == TTL Override ==
/// Per-call expiration override for `set` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlOverride {
    /// Expire this item `duration` after the moment of the call
    Sliding(Duration),
    /// Expire this item at a fixed wall-clock deadline (epoch milliseconds)
    AbsoluteAt(u64),
}

// == TTL Resolution ==
/// Resolves the effective absolute expiration for a write.
///
/// Precedence:
/// 1. Per-call absolute deadline, used verbatim
/// 2. Per-call sliding duration, added to `now`
/// 3. Repository default absolute expiration
/// 4. Repository default sliding window, added to `now`
/// 5. No expiration (`None`)
///
/// Pure given its inputs; the caller supplies the clock reading.
pub fn resolve_expires_at(
    now: u64,
    ttl: Option<TtlOverride>,
    config: &RepositoryConfig,
) -> Option<u64> {
    match ttl {
        Some(TtlOverride::AbsoluteAt(expires_at)) => Some(expires_at),
        Some(TtlOverride::Sliding(duration)) => Some(now + duration.as_millis() as u64),
        None => match (
            config.default_absolute_expiration,
            config.default_sliding_window,
        ) {
            (Some(expires_at), _) => Some(expires_at),
            (None, Some(window)) => Some(now + window.as_millis() as u64),
            (None, None) => None,
        },
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
