//! Error handling for the security cache loader

mod builders;
mod types;

pub use types::*;
