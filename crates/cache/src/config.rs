//! Security cache configuration with precedence and validation
use crate::errors::{CacheError, Result};
use crate::eviction::EvictionPolicyKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_CAPACITY: &str = "WARDEN_CACHE_CAPACITY";
pub const ENV_EVICTION_POLICY: &str = "WARDEN_CACHE_EVICTION_POLICY";
pub const ENV_TTL_SECS: &str = "WARDEN_CACHE_TTL_SECS";

const DEFAULT_CAPACITY: usize = 500;

/// Configuration of the default bounded backing store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityCacheConfig {
    /// Maximum number of cached entries
    pub capacity: usize,
    /// Victim selection once the capacity is reached
    pub eviction_policy: EvictionPolicyKind,
    /// Entries older than this many seconds are dropped
    pub time_to_live_secs: Option<u64>,
    /// Configuration source for debugging
    #[serde(skip)]
    pub source: ConfigSource,
}

impl Default for SecurityCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            eviction_policy: EvictionPolicyKind::default(),
            time_to_live_secs: None,
            source: ConfigSource::Default,
        }
    }
}

impl SecurityCacheConfig {
    #[must_use]
    pub fn builder() -> SecurityCacheConfigBuilder {
        SecurityCacheConfigBuilder::new()
    }

    #[must_use]
    pub fn time_to_live(&self) -> Option<Duration> {
        self.time_to_live_secs.map(Duration::from_secs)
    }

    /// Check that the configuration describes a usable store
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::Configuration {
                message: "capacity must be at least 1".to_string(),
            });
        }
        if self.time_to_live_secs == Some(0) {
            return Err(CacheError::Configuration {
                message: "time_to_live_secs must be positive when set".to_string(),
            });
        }
        Ok(())
    }

    /// Load defaults overridden by `WARDEN_CACHE_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        let mut overridden = Vec::new();

        if let Some(value) = read_env(ENV_CAPACITY) {
            config.capacity = value.parse().map_err(|e| CacheError::Configuration {
                message: format!("{ENV_CAPACITY}='{value}' is not a valid capacity: {e}"),
            })?;
            overridden.push(ENV_CAPACITY);
        }

        if let Some(value) = read_env(ENV_EVICTION_POLICY) {
            config.eviction_policy = value.parse()?;
            overridden.push(ENV_EVICTION_POLICY);
        }

        if let Some(value) = read_env(ENV_TTL_SECS) {
            let secs = value.parse().map_err(|e| CacheError::Configuration {
                message: format!("{ENV_TTL_SECS}='{value}' is not a number of seconds: {e}"),
            })?;
            config.time_to_live_secs = Some(secs);
            overridden.push(ENV_TTL_SECS);
        }

        if !overridden.is_empty() {
            config.source = ConfigSource::EnvironmentVariable(overridden.join(","));
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

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    #[default]
    Default,
    /// Environment variables, comma separated
    EnvironmentVariable(String),
    /// Set programmatically through the builder
    Programmatic,
}

/// Builder for creating security cache configurations
pub struct SecurityCacheConfigBuilder {
    config: SecurityCacheConfig,
}

impl SecurityCacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: SecurityCacheConfig::default(),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn with_eviction_policy(mut self, policy: EvictionPolicyKind) -> Self {
        self.config.eviction_policy = policy;
        self
    }

    /// Expire entries after `ttl`, rounded up to whole seconds
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
        self.config.time_to_live_secs = Some(secs);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SecurityCacheConfig> {
        let mut config = self.config;
        config.source = ConfigSource::Programmatic;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SecurityCacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
