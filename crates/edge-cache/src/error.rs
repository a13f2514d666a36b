//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the ephemeral cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing cache could not be reached.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Failed to serialize value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// TTL cannot be represented as an expiry time.
    #[error("Invalid TTL: {0:?}")]
    InvalidTtl(std::time::Duration),
}
