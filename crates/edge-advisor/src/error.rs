//! Advisor error types.

use edge_cache::CacheError;
use edge_core::StoreError;
use thiserror::Error;

/// Errors surfaced by advisor operations that read or write state.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Settings store failed.
    #[error("settings store error: {0}")]
    Store(#[from] StoreError),

    /// Rank cache failed.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// A stored setting has an unusable shape.
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    /// Advisor configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}
