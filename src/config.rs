//! Runtime settings.
//!
//! Every field has a default, so an empty environment yields a working setup. Values are
//! overridden with `FOOD_DISPATCH_*` variables, e.g.
//! `FOOD_DISPATCH_PREPARATION_TIME_MS=500`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Invalid configuration: {0}")]
pub struct ConfigError(#[from] config::ConfigError);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Deadline after which a dispatched bucket's capacity is released regardless of
    /// whether its worker has finished.
    pub preparation_time_ms: u64,
    /// Time the default processor spends on one bucket.
    pub processing_time_ms: u64,
    /// Capacity of every actor and worker-queue channel.
    pub channel_buffer: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            preparation_time_ms: 3000,
            processing_time_ms: 3000,
            channel_buffer: 32,
        }
    }
}

impl DispatchConfig {
    pub const ENV_PREFIX: &'static str = "FOOD_DISPATCH";

    /// Defaults overlaid with `FOOD_DISPATCH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix(Self::ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn preparation_time(&self) -> Duration {
        Duration::from_millis(self.preparation_time_ms)
    }

    pub fn processing_time(&self) -> Duration {
        Duration::from_millis(self.processing_time_ms)
    }

    /// A zero buffer would make `mpsc::channel` panic.
    pub fn buffer(&self) -> usize {
        self.channel_buffer.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.preparation_time(), Duration::from_secs(3));
        assert_eq!(config.processing_time(), Duration::from_secs(3));
        assert_eq!(config.buffer(), 32);
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let settings = config::Config::builder()
            .set_override("preparation_time_ms", 250)
            .unwrap()
            .build()
            .unwrap();
        let config: DispatchConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.preparation_time_ms, 250);
        assert_eq!(config.processing_time_ms, 3000);
    }

    #[test]
    fn test_zero_buffer_is_clamped() {
        let config = DispatchConfig {
            channel_buffer: 0,
            ..DispatchConfig::default()
        };
        assert_eq!(config.buffer(), 1);
    }
}
