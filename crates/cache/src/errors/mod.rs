//! Error handling for the security cache
//!
//! Structural races are reported as explicit variants so that callers can
//! decide whether and how often to retry.

mod recovery;
mod types;

pub use types::*;
