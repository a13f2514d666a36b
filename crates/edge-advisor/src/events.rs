//! Reactions to settings changes made outside the advisor.

use serde::{Deserialize, Serialize};

use crate::advisor::MaxAgeAdvisor;
use crate::error::AdvisorError;
use crate::migration::MigrationOutcome;
use crate::settings::MAX_AGE_SETTING_KEY;

/// A change the host reports to the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum SettingsEvent {
    /// A setting was written.
    Updated { key: String },
}

impl SettingsEvent {
    pub fn updated(key: impl Into<String>) -> Self {
        Self::Updated { key: key.into() }
    }

    /// The max-age record was written.
    pub fn max_age_updated() -> Self {
        Self::updated(MAX_AGE_SETTING_KEY)
    }
}

impl MaxAgeAdvisor {
    /// Apply a settings event.
    ///
    /// A write to the max-age record drops the memoized rank and re-runs the
    /// legacy migration. A cache failure while dropping the rank is logged
    /// and does not stop the migration. Other keys are ignored and return
    /// `None`.
    pub fn handle_event(
        &self,
        event: &SettingsEvent,
    ) -> Result<Option<MigrationOutcome>, AdvisorError> {
        match event {
            SettingsEvent::Updated { key } if key == MAX_AGE_SETTING_KEY => {
                self.forget_rank();
                let outcome = self.migrate_if_needed()?;
                tracing::debug!(?outcome, "handled max-age update");
                Ok(Some(outcome))
            }
            SettingsEvent::Updated { key } => {
                tracing::trace!(key = %key, "ignoring unrelated settings update");
                Ok(None)
            }
        }
    }

    /// Save a new max-age and apply the resulting update event.
    pub fn update_max_age(&self, seconds: u64) -> Result<Option<MigrationOutcome>, AdvisorError> {
        self.settings().save_max_age(seconds)?;
        self.handle_event(&SettingsEvent::max_age_updated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingCache, FailingStore, Fixture};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_update_forces_recompute() {
        let fx = Fixture::new();
        fx.save_max_age(300);
        assert_eq!(fx.advisor.current_rank().value(), 10);

        fx.save_max_age(432_000);
        fx.advisor
            .handle_event(&SettingsEvent::max_age_updated())
            .unwrap();
        assert!(fx.cached_rank().is_none());
        assert_eq!(fx.advisor.current_rank().value(), 3);
    }

    #[test]
    fn test_update_to_optimal_leaves_no_cache_entry() {
        let fx = Fixture::new();
        fx.save_max_age(300);
        fx.advisor.current_rank();

        fx.advisor.update_max_age(604_800).unwrap();
        assert!(fx.advisor.current_rank().is_optimal());
        assert!(fx.cached_rank().is_none());
    }

    #[test]
    fn test_first_save_runs_migration() {
        let fx = Fixture::new();

        let outcome = fx.advisor.update_max_age(600).unwrap();
        assert_eq!(
            outcome,
            Some(MigrationOutcome::Upgraded {
                from: 600,
                to: 604_800
            })
        );

        let outcome = fx.advisor.update_max_age(600).unwrap();
        assert_eq!(outcome, Some(MigrationOutcome::AlreadyMigrated));
        assert_eq!(fx.advisor.current_max_age().unwrap(), 600);
    }

    #[test]
    fn test_unrelated_key_is_ignored() {
        let fx = Fixture::new();
        fx.save_max_age(300);
        fx.advisor.current_rank();

        let outcome = fx
            .advisor
            .handle_event(&SettingsEvent::updated("blogname"))
            .unwrap();
        assert_eq!(outcome, None);
        assert_eq!(fx.cached_rank(), Some(json!(10)));
        assert!(!fx.advisor.settings().is_migrated().unwrap());
    }

    #[test]
    fn test_cache_outage_still_migrates() {
        let fx = Fixture::new();
        let advisor = crate::MaxAgeAdvisor::new(fx.store.clone(), Arc::new(FailingCache));

        let outcome = advisor.update_max_age(600).unwrap();
        assert_eq!(
            outcome,
            Some(MigrationOutcome::Upgraded {
                from: 600,
                to: 604_800
            })
        );
        assert_eq!(fx.advisor.current_max_age().unwrap(), 604_800);
        assert!(fx.advisor.settings().is_migrated().unwrap());
    }

    #[test]
    fn test_store_failure_is_reported() {
        let fx = Fixture::new();
        let advisor = crate::MaxAgeAdvisor::new(Arc::new(FailingStore), fx.cache.clone());
        assert!(matches!(
            advisor.handle_event(&SettingsEvent::max_age_updated()),
            Err(AdvisorError::Store(_))
        ));
    }

    #[test]
    fn test_event_serde() {
        let event: SettingsEvent =
            serde_json::from_value(json!({ "event": "updated", "key": "edge-cache" })).unwrap();
        assert_eq!(event, SettingsEvent::max_age_updated());
    }
}
