//! Room configuration types for Batepapo.
//!
//! `ChatConfig` represents the `config.toml` in the data directory that
//! controls the presence sweep and the listen address.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest accepted inactivity timeout (one year).
pub const MAX_INACTIVITY_TIMEOUT_SECS: u64 = 365 * 24 * 60 * 60;

/// Top-level configuration for a Batepapo server.
///
/// Loaded from `~/.batepapo/config.toml`. All fields have defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Seconds between two presence sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// A participant silent for longer than this is evicted by the sweep.
    #[serde(default = "default_inactivity_timeout_secs")]
    pub inactivity_timeout_secs: u64,

    /// Address the REST API binds to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_sweep_interval_secs() -> u64 {
    15
}

fn default_inactivity_timeout_secs() -> u64 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl ChatConfig {
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn inactivity_timeout(&self) -> Result<Duration, ConfigError> {
        timeout_from_secs(self.inactivity_timeout_secs)
    }

    /// Reject values the sweeper cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::ZeroSweepInterval);
        }
        self.inactivity_timeout()?;
        Ok(())
    }
}

/// Whole seconds as an inactivity timeout, capped at [`MAX_INACTIVITY_TIMEOUT_SECS`].
pub fn timeout_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs > MAX_INACTIVITY_TIMEOUT_SECS {
        return Err(ConfigError::TimeoutOutOfRange(secs));
    }
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or(ConfigError::TimeoutOutOfRange(secs))
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            inactivity_timeout_secs: default_inactivity_timeout_secs(),
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_default_values() {
        let config = ChatConfig::default();
        assert_eq!(config.sweep_interval_secs, 15);
        assert_eq!(config.inactivity_timeout_secs, 10);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_chat_config_deserialize_with_defaults() {
        let config: ChatConfig = toml::from_str("").unwrap();
        assert_eq!(config.sweep_interval_secs, 15);
        assert_eq!(config.inactivity_timeout_secs, 10);
    }

    #[test]
    fn test_chat_config_deserialize_with_values() {
        let toml_str = r#"
sweep_interval_secs = 30
inactivity_timeout_secs = 60
port = 8080
"#;
        let config: ChatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sweep_interval_secs, 30);
        assert_eq!(config.inactivity_timeout_secs, 60);
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_durations() {
        let config = ChatConfig::default();
        assert_eq!(config.sweep_interval(), std::time::Duration::from_secs(15));
        assert_eq!(config.inactivity_timeout(), Ok(Duration::seconds(10)));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_sweep_interval() {
        let config: ChatConfig = toml::from_str("sweep_interval_secs = 0").unwrap();
        assert_eq!(config.validate(), Err(ConfigError::ZeroSweepInterval));
    }

    #[test]
    fn test_huge_timeout_is_an_error_not_a_panic() {
        let config: ChatConfig =
            toml::from_str("inactivity_timeout_secs = 9223372036854775807").unwrap();
        assert_eq!(
            config.inactivity_timeout(),
            Err(ConfigError::TimeoutOutOfRange(i64::MAX as u64))
        );
        assert!(config.validate().is_err());

        assert!(timeout_from_secs(u64::MAX).is_err());
        assert!(timeout_from_secs(MAX_INACTIVITY_TIMEOUT_SECS + 1).is_err());
        assert_eq!(
            timeout_from_secs(MAX_INACTIVITY_TIMEOUT_SECS),
            Ok(Duration::seconds(MAX_INACTIVITY_TIMEOUT_SECS as i64))
        );
    }
}
