//! Configuration Module
//!
//! Per-repository configuration with sensible defaults.

use std::time::Duration;

/// Default sliding window applied when neither the call nor the repository
/// configures an expiration override.
pub const DEFAULT_SLIDING_WINDOW: Duration = Duration::from_millis(60_000);

/// Default interval between background sweep passes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(60_000);

/// Configuration for a single cache repository instance.
///
/// No validation happens at construction time; callers are responsible for
/// supplying sane intervals.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Repository name, used for diagnostics only
    pub name: String,
    /// Duration added to "now" to compute a default expiration,
    /// None = entries without an override never expire by default
    pub default_sliding_window: Option<Duration>,
    /// Fixed wall-clock deadline (epoch milliseconds) applied to every item
    /// unless overridden per call
    pub default_absolute_expiration: Option<u64>,
    /// Whether a background sweep task should run
    pub auto_sweep: bool,
    /// Interval between background sweep passes
    pub sweep_interval: Duration,
}

impl RepositoryConfig {
    /// Creates a configuration with the given name and default settings.
    ///
    /// Defaults: 60 second sliding window, no absolute expiration,
    /// auto-sweep enabled with a 60 second interval.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the default sliding window.
    pub fn with_sliding_window(mut self, window: Duration) -> Self {
        self.default_sliding_window = Some(window);
        self
    }

    /// Removes the default sliding window, so that entries without a
    /// per-call override or absolute default never expire.
    pub fn without_sliding_window(mut self) -> Self {
        self.default_sliding_window = None;
        self
    }

    /// Sets a fixed wall-clock deadline (epoch milliseconds) applied to
    /// every item unless overridden per call.
    pub fn with_absolute_expiration(mut self, expires_at: u64) -> Self {
        self.default_absolute_expiration = Some(expires_at);
        self
    }

    /// Sets the interval between background sweep passes.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Enables or disables the background sweep task.
    pub fn with_auto_sweep(mut self, enabled: bool) -> Self {
        self.auto_sweep = enabled;
        self
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            name: "cache".to_string(),
            default_sliding_window: Some(DEFAULT_SLIDING_WINDOW),
            default_absolute_expiration: None,
            auto_sweep: true,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}
