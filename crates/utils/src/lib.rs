//! Shared utilities for warden
//!
//! This crate provides helpers used throughout the warden workspace,
//! currently the tracing setup shared by embedders and tests.

pub mod tracing;

pub use self::tracing::{init, init_for_tests};
