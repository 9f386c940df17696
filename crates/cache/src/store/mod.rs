//! Flat key/value backing stores
//!
//! The security cache keeps its values in a [`BackingStore`]. Stores may
//! drop entries on their own (capacity, time-to-live); every change is
//! reported to subscribed [`StoreListener`]s so that the cache can repair
//! its hierarchy.

mod bounded;
mod traits;

pub use bounded::BoundedStore;
pub use traits::{BackingStore, EvictionCause, StoreEvent, StoreListener};
