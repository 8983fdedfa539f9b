//! Configuration Module
//!
//! Handles loading cache parameters from environment variables for the
//! demonstration binary.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in seconds for entries stored with `Expiration::Default`
    /// (0 = such entries never expire)
    pub default_ttl_secs: u64,
    /// Background sweep interval in seconds
    pub sweep_interval_secs: u64,
    /// Maximum number of entries in the LRU cache
    pub lru_capacity: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `LRU_CAPACITY` - Maximum LRU entries (default: 1000)
    pub fn from_env() -> Self {
        Self {
            default_ttl_secs: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            sweep_interval_secs: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            lru_capacity: env::var("LRU_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        }
    }

    /// Default TTL as a duration, honoring the 0 = never-expires convention.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Sweep interval as a duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_secs: 300,
            sweep_interval_secs: 1,
            lru_capacity: 1000,
        }
    }
}
