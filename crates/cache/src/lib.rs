//! Hierarchical security cache for warden
//!
//! This crate provides the cache layer of the authorization system:
//! - Rule entries keyed by security reference, inserted parent before child
//! - User and group entries depending on the groups they belong to
//! - Shadow entries for users acting in a foreign wiki
//! - Settled access entries for (user, entity) pairs
//! - Cascading removal of everything depending on a removed entry
//! - A bounded backing store with LRU/LFU eviction and time-to-live

pub mod bridge;
pub mod config;
pub mod core;
pub mod errors;
pub mod eviction;
pub mod keys;
pub mod store;

pub use bridge::EvictionBridge;
pub use config::{ConfigSource, SecurityCacheConfig, SecurityCacheConfigBuilder};
pub use core::{CacheNode, CacheStatistics, SecurityCache, SecurityCacheStore};
pub use errors::{CacheError, Result};
pub use eviction::EvictionPolicyKind;
pub use keys::CacheKey;
pub use store::{BackingStore, BoundedStore, EvictionCause, StoreEvent, StoreListener};
