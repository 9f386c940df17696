//! Loader configuration
use crate::errors::{AuthorizationError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_MAX_ATTEMPTS: &str = "WARDEN_LOADER_MAX_ATTEMPTS";
pub const ENV_RETRY_DELAY_MS: &str = "WARDEN_LOADER_RETRY_DELAY_MS";

/// Attempts made before giving up on a racing load
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Retry behaviour of the security cache loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Attempts per resolution, the first one included
    pub max_attempts: u32,
    /// Pause between two attempts
    pub retry_delay_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: 0,
        }
    }
}

impl LoaderConfig {
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(AuthorizationError::configuration(
                "max_attempts must be at least 1",
            ));
        }
        Ok(())
    }

    /// Load defaults overridden by `WARDEN_LOADER_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = read_env(ENV_MAX_ATTEMPTS) {
            config.max_attempts = value.parse().map_err(|e| {
                AuthorizationError::configuration(format!(
                    "{ENV_MAX_ATTEMPTS}='{value}' is not a valid attempt count: {e}"
                ))
            })?;
        }

        if let Some(value) = read_env(ENV_RETRY_DELAY_MS) {
            config.retry_delay_ms = value.parse().map_err(|e| {
                AuthorizationError::configuration(format!(
                    "{ENV_RETRY_DELAY_MS}='{value}' is not a number of milliseconds: {e}"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ENV_MAX_ATTEMPTS);
        std::env::remove_var(ENV_RETRY_DELAY_MS);
    }

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_delay(), Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = LoaderConfig::default().with_max_attempts(0);
        assert!(matches!(
            config.validate(),
            Err(AuthorizationError::Configuration { .. })
        ));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LoaderConfig = serde_json::from_str(r#"{"max_attempts": 3}"#).unwrap();
        assert_eq!(config, LoaderConfig::default().with_max_attempts(3));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var(ENV_MAX_ATTEMPTS, "9");
        std::env::set_var(ENV_RETRY_DELAY_MS, "15");
        let config = LoaderConfig::from_env();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.max_attempts, 9);
        assert_eq!(config.retry_delay(), Duration::from_millis(15));
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_zero() {
        clear_env();
        std::env::set_var(ENV_MAX_ATTEMPTS, "0");
        let result = LoaderConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
