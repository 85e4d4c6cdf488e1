//! Pipeline configuration
//!
//! Defines all configurable parameters for a pipeline run: the
//! concurrency ceiling, the render cadence, and the progress store
//! capacity bounds.

use std::time::Duration;

/// Pipeline configuration
///
/// Intervals and capacities are configurable to allow tuning for
/// different terminals and payload sizes.
#[derive(Debug, Clone)]
pub struct Config {
    /// Max number of units that may run concurrently; unbounded if unset
    pub max_concurrency: Option<usize>,

    /// How long to wait between rendering each frame
    pub render_interval: Duration,

    /// Initial capacity of the progress store region in bytes
    pub store_initial_capacity: usize,

    /// Hard ceiling the store region may grow to in bytes
    pub store_capacity_limit: usize,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            max_concurrency: None,
            render_interval: Duration::from_millis(80),
            store_initial_capacity: 16_000,
            store_capacity_limit: 128_000_000,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables:
    /// - CONVOY_MAX_CONCURRENCY (optional, unbounded if unset)
    /// - CONVOY_RENDER_INTERVAL_MS (optional, default: 80)
    /// - CONVOY_STORE_INITIAL_BYTES (optional, default: 16000)
    /// - CONVOY_STORE_LIMIT_BYTES (optional, default: 128000000)
    pub fn from_env() -> Self {
        let defaults = Self::new();

        let max_concurrency = std::env::var("CONVOY_MAX_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse::<usize>().ok());

        let render_interval = std::env::var("CONVOY_RENDER_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.render_interval);

        let store_initial_capacity = std::env::var("CONVOY_STORE_INITIAL_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.store_initial_capacity);

        let store_capacity_limit = std::env::var("CONVOY_STORE_LIMIT_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.store_capacity_limit);

        Self {
            max_concurrency,
            render_interval,
            store_initial_capacity,
            store_capacity_limit,
        }
    }

    /// Sets the concurrency ceiling
    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Sets the render interval
    pub fn with_render_interval(mut self, interval: Duration) -> Self {
        self.render_interval = interval;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_concurrency == Some(0) {
            anyhow::bail!("max_concurrency must be greater than 0 when set");
        }

        if self.render_interval.is_zero() {
            anyhow::bail!("render_interval must be greater than 0");
        }

        if self.store_initial_capacity == 0 {
            anyhow::bail!("store_initial_capacity must be greater than 0");
        }

        if self.store_capacity_limit < self.store_initial_capacity {
            anyhow::bail!("store_capacity_limit must be at least store_initial_capacity");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
