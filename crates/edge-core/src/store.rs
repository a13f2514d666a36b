//! Persistent settings and per-user flag storage.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::context::UserId;
use crate::error::StoreError;

/// Access to the site's persistent settings and per-user metadata.
///
/// Implementations wrap whatever key-value service the host platform uses.
/// Values are JSON so that records with extra fields survive a rewrite.
pub trait SettingsStore: Send + Sync {
    /// Read a setting. `None` if it was never saved.
    fn get_setting(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a setting. Returns `true` if the stored value changed.
    fn set_setting(&self, key: &str, value: Value) -> Result<bool, StoreError>;

    /// Read a boolean flag attached to a user. Absent flags read as `false`.
    fn get_user_flag(&self, user: UserId, key: &str) -> Result<bool, StoreError>;

    /// Write a boolean flag attached to a user.
    fn set_user_flag(&self, user: UserId, key: &str, value: bool) -> Result<(), StoreError>;
}

/// In-process settings store.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<HashMap<String, Value>>,
    user_flags: Mutex<HashMap<(UserId, String), bool>>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a setting entirely.
    pub fn delete_setting(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.settings)?.remove(key);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
}

impl SettingsStore for MemorySettingsStore {
    fn get_setting(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(lock(&self.settings)?.get(key).cloned())
    }

    fn set_setting(&self, key: &str, value: Value) -> Result<bool, StoreError> {
        let previous = lock(&self.settings)?.insert(key.to_string(), value.clone());
        Ok(previous.as_ref() != Some(&value))
    }

    fn get_user_flag(&self, user: UserId, key: &str) -> Result<bool, StoreError> {
        Ok(lock(&self.user_flags)?
            .get(&(user, key.to_string()))
            .copied()
            .unwrap_or(false))
    }

    fn set_user_flag(&self, user: UserId, key: &str, value: bool) -> Result<(), StoreError> {
        lock(&self.user_flags)?.insert((user, key.to_string()), value);
        Ok(())
    }
}
