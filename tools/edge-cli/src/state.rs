//! File-backed settings store and rank cache for the CLI.
//!
//! One JSON document holds site settings, per-user flags and cache entries,
//! so successive `edge` invocations see each other's writes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use edge_cache::{CacheEntry, CacheError, CacheKey, Clock, EphemeralCache, SystemClock};
use edge_core::{SettingsStore, StoreError, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// On-disk layout of the state file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,

    /// Flags keyed by user ID, then flag name.
    #[serde(default)]
    pub user_flags: BTreeMap<u64, BTreeMap<String, bool>>,

    #[serde(default)]
    pub cache: BTreeMap<String, CacheEntry>,
}

/// Settings store and ephemeral cache persisted to a JSON file.
pub struct FileStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open the state file at `path`. A missing file reads as empty state.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document.
    pub fn load(&self) -> Result<StateDocument, StoreError> {
        if !self.path.exists() {
            return Ok(StateDocument::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            StoreError::Unavailable(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(StateDocument::default());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, doc: &StateDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let content = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, content).map_err(|e| {
            StoreError::Unavailable(format!("cannot write {}: {}", self.path.display(), e))
        })
    }

    /// Load, apply `f`, and save if `f` reports a change.
    fn update<T>(
        &self,
        f: impl FnOnce(&mut StateDocument) -> (T, bool),
    ) -> Result<T, StoreError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".to_string()))?;

        let mut doc = self.load()?;
        let (result, changed) = f(&mut doc);
        if changed {
            self.save(&doc)?;
        }
        Ok(result)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore").field("path", &self.path).finish()
    }
}

impl SettingsStore for FileStore {
    fn get_setting(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.load()?.settings.get(key).cloned())
    }

    fn set_setting(&self, key: &str, value: Value) -> Result<bool, StoreError> {
        self.update(|doc| {
            let previous = doc.settings.insert(key.to_string(), value.clone());
            let changed = previous.as_ref() != Some(&value);
            (changed, changed)
        })
    }

    fn get_user_flag(&self, user: UserId, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .load()?
            .user_flags
            .get(&user.get())
            .and_then(|flags| flags.get(key))
            .copied()
            .unwrap_or(false))
    }

    fn set_user_flag(&self, user: UserId, key: &str, value: bool) -> Result<(), StoreError> {
        self.update(|doc| {
            let flags = doc.user_flags.entry(user.get()).or_default();
            let previous = flags.insert(key.to_string(), value);
            ((), previous != Some(value))
        })
    }
}

fn cache_error(err: StoreError) -> CacheError {
    match err {
        StoreError::Serialization(e) => CacheError::SerializeError(e),
        other => CacheError::Unavailable(other.to_string()),
    }
}

impl EphemeralCache for FileStore {
    fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        let now = self.clock.now();
        let doc = self.load().map_err(cache_error)?;
        Ok(doc
            .cache
            .get(key.as_str())
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &CacheKey, value: Value, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry::new(value, ttl, self.clock.now())?;
        self.update(|doc| {
            doc.cache.insert(key.to_string(), entry);
            ((), true)
        })
        .map_err(cache_error)
    }

    fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.update(|doc| {
            let removed = doc.cache.remove(key.as_str()).is_some();
            ((), removed)
        })
        .map_err(cache_error)
    }
}
