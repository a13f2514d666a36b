//! Shared fixtures for the advisor's unit tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use edge_cache::{CacheError, CacheKey, EphemeralCache, ManualClock, MemoryCache};
use edge_core::{
    Integration, MemorySettingsStore, RequestContext, Screen, SettingsStore, StoreError, UserId,
    Viewer,
};
use serde_json::Value;

use crate::advisor::MaxAgeAdvisor;
use crate::settings::MaxAgeSettings;

pub(crate) const ADMIN: u64 = 1;

pub(crate) struct Fixture {
    pub store: Arc<MemorySettingsStore>,
    pub cache: Arc<MemoryCache>,
    pub clock: Arc<ManualClock>,
    pub advisor: MaxAgeAdvisor,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(MemorySettingsStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ));
        let cache = Arc::new(MemoryCache::with_clock(clock.clone()));
        let advisor = MaxAgeAdvisor::new(store.clone(), cache.clone());

        Self {
            store,
            cache,
            clock,
            advisor,
        }
    }

    /// A fresh advisor over the same store and cache.
    pub fn rebuild(&self) -> MaxAgeAdvisor {
        MaxAgeAdvisor::new(self.store.clone(), self.cache.clone())
    }

    /// Save a max-age without firing the update event.
    pub fn save_max_age(&self, seconds: u64) {
        MaxAgeSettings::new(self.store.as_ref())
            .save_max_age(seconds)
            .unwrap();
    }

    pub fn cached_rank(&self) -> Option<Value> {
        self.cache.get(&CacheKey::rank()).unwrap()
    }

    pub fn seen(&self, user: u64, flag: &str) -> bool {
        self.store.get_user_flag(UserId(user), flag).unwrap()
    }
}

fn current_integration() -> Integration {
    Integration::installed("1.4.2").unwrap()
}

/// Settings view, current integration, admin signed in.
pub(crate) fn settings_view() -> RequestContext {
    RequestContext::new(Screen::Settings, current_integration()).with_viewer(Viewer::manager(ADMIN))
}

/// Some other admin view, current integration, admin signed in.
pub(crate) fn dashboard() -> RequestContext {
    RequestContext::new(Screen::from_id("dashboard"), current_integration())
        .with_viewer(Viewer::manager(ADMIN))
}

/// A store whose backend is down.
pub(crate) struct FailingStore;

impl SettingsStore for FailingStore {
    fn get_setting(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("settings backend down".to_string()))
    }

    fn set_setting(&self, _key: &str, _value: Value) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("settings backend down".to_string()))
    }

    fn get_user_flag(&self, _user: UserId, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("settings backend down".to_string()))
    }

    fn set_user_flag(&self, _user: UserId, _key: &str, _value: bool) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("settings backend down".to_string()))
    }
}

/// A cache whose backend is down.
pub(crate) struct FailingCache;

impl EphemeralCache for FailingCache {
    fn get(&self, _key: &CacheKey) -> Result<Option<Value>, CacheError> {
        Err(CacheError::Unavailable("cache backend down".to_string()))
    }

    fn set(&self, _key: &CacheKey, _value: Value, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("cache backend down".to_string()))
    }

    fn delete(&self, _key: &CacheKey) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("cache backend down".to_string()))
    }
}
