//! Cache configuration.
//!
//! Controls the object cache via `vitrina.toml`.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Cache configuration from `vitrina.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the object cache. When disabled every read goes upstream.
    pub enabled: bool,
    /// How often the background sweeper drops expired entries.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl CacheConfig {
    /// Sweep cadence as a `Duration`, clamped to at least one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            sweep_interval_secs: settings.sweep_interval_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.sweep_interval_secs, 60);
    }

    #[test]
    fn sweep_interval_clamps_zero() {
        let config = CacheConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }
}
