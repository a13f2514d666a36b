//! Typed access to the max-age record, the migration flag and per-user
//! notice flags.

use std::collections::BTreeMap;

use edge_core::{SettingsStore, UserId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AdvisorError;

/// Settings record holding the edge cache configuration.
pub const MAX_AGE_SETTING_KEY: &str = "edge-cache";

/// Field of the settings record holding the max-age in seconds.
pub const MAX_AGE_FIELD: &str = "default_ttl";

/// Setting recording that the legacy migration has inspected this site.
pub const MIGRATION_FLAG_KEY: &str = "edge_max_age_updated";

/// Notices a user only ever sees once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeenNotice {
    /// The low max-age warning shown outside the settings view.
    GlobalLowMaxAge,
    /// The acknowledgment that the legacy max-age was promoted.
    MaxAgeUpdated,
}

impl SeenNotice {
    /// Every once-only notice.
    pub const ALL: [SeenNotice; 2] = [SeenNotice::GlobalLowMaxAge, SeenNotice::MaxAgeUpdated];

    /// Per-user flag key in the settings store.
    pub fn flag_key(&self) -> &'static str {
        match self {
            Self::GlobalLowMaxAge => "max_age_global_warning_notice",
            Self::MaxAgeUpdated => "max_age_updated_notice",
        }
    }
}

/// Which once-only notices one user has already been shown.
pub struct NoticeLedger<'a> {
    store: &'a dyn SettingsStore,
    user: UserId,
}

impl<'a> NoticeLedger<'a> {
    /// Ledger for `user`.
    pub fn new(store: &'a dyn SettingsStore, user: UserId) -> Self {
        Self { store, user }
    }

    /// Check if the user has been shown `notice`.
    pub fn has_seen(&self, notice: SeenNotice) -> Result<bool, AdvisorError> {
        Ok(self.store.get_user_flag(self.user, notice.flag_key())?)
    }

    /// Record that the user has been shown `notice`.
    pub fn mark_seen(&self, notice: SeenNotice) -> Result<(), AdvisorError> {
        self.store.set_user_flag(self.user, notice.flag_key(), true)?;
        tracing::debug!(user = %self.user, notice = notice.flag_key(), "marked notice as seen");
        Ok(())
    }

    /// State of every once-only notice for this user.
    pub fn snapshot(&self) -> Result<BTreeMap<SeenNotice, bool>, AdvisorError> {
        SeenNotice::ALL
            .iter()
            .map(|notice| Ok((*notice, self.has_seen(*notice)?)))
            .collect()
    }
}

/// Typed view over the settings store.
pub struct MaxAgeSettings<'a> {
    store: &'a dyn SettingsStore,
}

impl<'a> MaxAgeSettings<'a> {
    /// Wrap a settings store.
    pub fn new(store: &'a dyn SettingsStore) -> Self {
        Self { store }
    }

    /// Read a setting, falling back to `default` when it was never saved.
    pub fn get_setting<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, AdvisorError> {
        match self.store.get_setting(key)? {
            None | Some(Value::Null) => Ok(default),
            Some(value) => {
                serde_json::from_value(value).map_err(|e| AdvisorError::InvalidSetting {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Max-age explicitly saved for this site, if any.
    ///
    /// Negative values read as 0. Values that are not numbers read as absent.
    pub fn saved_max_age(&self) -> Result<Option<u64>, AdvisorError> {
        let Some(record) = self.store.get_setting(MAX_AGE_SETTING_KEY)? else {
            return Ok(None);
        };

        let Some(raw) = record.get(MAX_AGE_FIELD) else {
            return Ok(None);
        };

        let parsed = parse_seconds(raw);
        if parsed.is_none() && !raw.is_null() {
            tracing::warn!(value = %raw, "ignoring non-numeric saved max-age");
        }
        Ok(parsed)
    }

    /// Saved max-age, only when stored as a non-negative JSON integer.
    pub fn saved_integer_max_age(&self) -> Result<Option<u64>, AdvisorError> {
        Ok(self
            .store
            .get_setting(MAX_AGE_SETTING_KEY)?
            .as_ref()
            .and_then(|record| record.get(MAX_AGE_FIELD))
            .and_then(Value::as_u64))
    }

    /// Save a new max-age, keeping the rest of the settings record intact.
    pub fn save_max_age(&self, seconds: u64) -> Result<bool, AdvisorError> {
        let mut record = match self.store.get_setting(MAX_AGE_SETTING_KEY)? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        record.insert(MAX_AGE_FIELD.to_string(), Value::from(seconds));

        Ok(self
            .store
            .set_setting(MAX_AGE_SETTING_KEY, Value::Object(record))?)
    }

    /// Check if the legacy migration has already run.
    pub fn is_migrated(&self) -> Result<bool, AdvisorError> {
        Ok(self
            .store
            .get_setting(MIGRATION_FLAG_KEY)?
            .as_ref()
            .is_some_and(is_truthy))
    }

    /// Record that the legacy migration has run.
    pub fn mark_migrated(&self) -> Result<(), AdvisorError> {
        self.store.set_setting(MIGRATION_FLAG_KEY, Value::Bool(true))?;
        Ok(())
    }
}

fn parse_seconds(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Some(v)
            } else if n.as_i64().is_some() {
                // Any integer that is not a u64 is negative.
                Some(0)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.max(0.0).round() as u64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok().map(|v| v.max(0) as u64),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
