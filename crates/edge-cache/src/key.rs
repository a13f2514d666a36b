//! Cache key composition.

use serde::{Deserialize, Serialize};

/// Key of the memoized max-age deviation rank.
pub const RANK_CACHE_KEY: &str = "edge_max_age_compare";

/// A key identifying one entry in the ephemeral cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Create a cache key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key under which the deviation rank is memoized.
    pub fn rank() -> Self {
        Self::new(RANK_CACHE_KEY)
    }

    /// Get the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_key() {
        assert_eq!(CacheKey::rank().as_str(), RANK_CACHE_KEY);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&CacheKey::new("abc")).unwrap();
        assert_eq!(json, r#""abc""#);
    }
}
