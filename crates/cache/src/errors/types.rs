//! Core error types for the cache system

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Error type for cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A required parent (or group) entry is absent, or vanished while the
    /// insertion was in flight
    #[error("cannot insert '{key}': required entry '{parent}' is not cached")]
    ParentEvicted { key: String, parent: String },

    /// A different value already occupies the key
    #[error("conflicting insertion for cache key '{key}'")]
    ConflictingInsertion { key: String },

    /// The key cannot describe a valid cache entry
    #[error("invalid cache key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Configuration error
    #[error("cache configuration error: {message}")]
    Configuration { message: String },
}
