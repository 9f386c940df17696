//! Eviction policies for the bounded backing store
//!
//! Policies only track usage order; the store decides when it is over
//! capacity and asks the policy for the next victim.

mod factory;
mod policies;
mod traits;

pub use factory::{create_eviction_policy, EvictionPolicyKind};
pub use policies::{LfuPolicy, LruPolicy};
pub use traits::EvictionPolicy;
