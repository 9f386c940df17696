//! Cache operations module

mod get;
mod insert;
mod remove;

// Operations are implemented directly on the cache types
