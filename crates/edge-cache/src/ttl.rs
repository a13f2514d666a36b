//! Ephemeral key-value cache with time-to-live.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CacheError;
use crate::key::CacheKey;

/// Outcome of a cache lookup, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Value served from the cache.
    Hit,
    /// Value computed and stored.
    Miss,
    /// Value computed but deliberately not stored.
    Bypass,
    /// Cache failed; value computed without it.
    Error,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::Bypass => write!(f, "BYPASS"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        if let (Ok(mut now), Ok(delta)) = (self.now.lock(), chrono::Duration::from_std(by)) {
            *now += delta;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Utc::now())
    }
}

/// A shared key-value cache whose entries expire.
///
/// A zero TTL stores the entry without expiry. Implementations must treat
/// expired entries as absent.
pub trait EphemeralCache: Send + Sync {
    /// Read an entry. `None` if absent or expired.
    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError>;

    /// Store an entry for `ttl`, replacing any previous value.
    fn set(&self, key: &CacheKey, value: Value, ttl: Duration) -> Result<(), CacheError>;

    /// Remove an entry. Removing an absent key is not an error.
    fn delete(&self, key: &CacheKey) -> Result<(), CacheError>;
}

/// A stored value with its expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cached value.
    pub value: Value,
    /// When the entry stops being served. `None` never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Create an entry expiring `ttl` after `now`.
    pub fn new(value: Value, ttl: Duration, now: DateTime<Utc>) -> Result<Self, CacheError> {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            let delta = chrono::Duration::from_std(ttl).map_err(|_| CacheError::InvalidTtl(ttl))?;
            Some(
                now.checked_add_signed(delta)
                    .ok_or(CacheError::InvalidTtl(ttl))?,
            )
        };
        Ok(Self { value, expires_at })
    }

    /// Check if the entry has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Remaining lifetime at `now`, `None` if it never expires.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|at| (at - now).to_std().unwrap_or(Duration::ZERO))
    }
}

/// In-process ephemeral cache.
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.entries.lock().map(|e| e.len()).unwrap_or(0);
        f.debug_struct("MemoryCache").field("entries", &len).finish()
    }
}

impl MemoryCache {
    /// Create a cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a cache on a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Raw entry, including expiry, if present and live.
    pub fn entry(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let now = self.clock.now();
        Ok(self
            .lock()?
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .cloned())
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| !e.is_expired(now)).count())
            .unwrap_or(0)
    }

    /// Check if there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CacheKey, CacheEntry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Unavailable("cache lock poisoned".to_string()))
    }
}

impl EphemeralCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        let now = self.clock.now();
        let mut entries = self.lock()?;

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                tracing::trace!(key = %key, "evicting expired cache entry");
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &CacheKey, value: Value, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry::new(value, ttl, self.clock.now())?;
        self.lock()?.insert(key.clone(), entry);
        Ok(())
    }

    fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_set_get_delete() {
        let cache = MemoryCache::new();
        let key = CacheKey::new("k");

        assert!(cache.get(&key).unwrap().is_none());
        cache.set(&key, json!(4), Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get(&key).unwrap(), Some(json!(4)));

        cache.delete(&key).unwrap();
        assert!(cache.get(&key).unwrap().is_none());
        // Deleting again is fine.
        cache.delete(&key).unwrap();
    }

    #[test]
    fn test_entries_expire() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = MemoryCache::with_clock(clock.clone());
        let key = CacheKey::new("k");

        cache.set(&key, json!(true), Duration::from_secs(10)).unwrap();
        clock.advance(Duration::from_secs(9));
        assert_eq!(cache.get(&key).unwrap(), Some(json!(true)));

        clock.advance(Duration::from_secs(1));
        assert!(cache.get(&key).unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = MemoryCache::with_clock(clock.clone());
        let key = CacheKey::new("forever");

        cache.set(&key, json!("v"), Duration::ZERO).unwrap();
        clock.advance(Duration::from_secs(10 * 365 * 86_400));
        assert_eq!(cache.get(&key).unwrap(), Some(json!("v")));
        assert_eq!(cache.entry(&key).unwrap().unwrap().expires_at, None);
    }

    #[test]
    fn test_set_overwrites_and_resets_ttl() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = MemoryCache::with_clock(clock.clone());
        let key = CacheKey::new("k");

        cache.set(&key, json!(1), Duration::from_secs(10)).unwrap();
        clock.advance(Duration::from_secs(8));
        cache.set(&key, json!(2), Duration::from_secs(10)).unwrap();
        clock.advance(Duration::from_secs(8));

        assert_eq!(cache.get(&key).unwrap(), Some(json!(2)));
        assert_eq!(
            cache.entry(&key).unwrap().unwrap().remaining(clock.now()),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn test_entry_rejects_unrepresentable_ttl() {
        let err = CacheEntry::new(json!(1), Duration::from_secs(u64::MAX), start()).unwrap_err();
        assert!(matches!(err, CacheError::InvalidTtl(_)));
    }

    #[test]
    fn test_cache_status_display() {
        assert_eq!(CacheStatus::Hit.to_string(), "HIT");
        assert_eq!(CacheStatus::Bypass.to_string(), "BYPASS");
    }
}
