//! Factory for creating eviction policies

use crate::errors::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use super::policies::{LfuPolicy, LruPolicy};
use super::traits::EvictionPolicy;

/// Available eviction strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicyKind {
    #[default]
    Lru,
    Lfu,
}

impl FromStr for EvictionPolicyKind {
    type Err = CacheError;

    fn from_str(policy_type: &str) -> Result<Self> {
        match policy_type.to_lowercase().as_str() {
            "lru" => Ok(Self::Lru),
            "lfu" => Ok(Self::Lfu),
            _ => Err(CacheError::Configuration {
                message: format!("Unknown eviction policy: {policy_type} (expected lru or lfu)"),
            }),
        }
    }
}

impl fmt::Display for EvictionPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lru => f.write_str("lru"),
            Self::Lfu => f.write_str("lfu"),
        }
    }
}

/// Eviction policy factory
pub fn create_eviction_policy<K>(kind: EvictionPolicyKind) -> Box<dyn EvictionPolicy<K>>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
{
    match kind {
        EvictionPolicyKind::Lru => Box::new(LruPolicy::new()),
        EvictionPolicyKind::Lfu => Box::new(LfuPolicy::new()),
    }
}
