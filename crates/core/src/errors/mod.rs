//! Error types for reference construction and configuration

mod builders;
mod display;
mod types;

pub use types::{Error, Result};
