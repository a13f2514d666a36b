//! Ephemeral cache and max-age policy for the edge cache advisor.
//!
//! This crate provides:
//! - `MaxAgePolicy` - Recommended and legacy max-age values with an override hook
//! - `EphemeralCache` - Get/set/delete with time-to-live
//! - `MemoryCache` - In-process `EphemeralCache` with an injectable `Clock`
//! - `CacheKey` - Fixed-name cache keys
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use edge_cache::{CacheKey, EphemeralCache, MaxAgePolicy, MemoryCache};
//!
//! let policy = MaxAgePolicy::new().with_override(|week| week / 2);
//! let cache = MemoryCache::new();
//!
//! cache.set(&CacheKey::new("rank"), serde_json::json!(3), policy.rank_ttl())?;
//! ```

mod error;
mod key;
mod policy;
mod ttl;

pub use error::*;
pub use key::*;
pub use policy::*;
pub use ttl::*;
