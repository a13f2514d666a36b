//! One-time promotion of the legacy max-age default.

use serde::Serialize;

use crate::advisor::MaxAgeAdvisor;
use crate::error::AdvisorError;

/// What the legacy migration did on one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum MigrationOutcome {
    /// The migration flag was already set; nothing was inspected.
    AlreadyMigrated,
    /// No max-age was ever saved; the flag stays unset so a later run retries.
    NothingSaved,
    /// A deliberate value was found and left alone.
    Kept { max_age: u64 },
    /// The legacy default was replaced by the recommendation.
    Upgraded { from: u64, to: u64 },
}

impl MigrationOutcome {
    /// Check if the saved max-age was rewritten.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Upgraded { .. })
    }
}

impl MaxAgeAdvisor {
    /// Promote a saved legacy max-age to the recommendation, at most once.
    ///
    /// Sets the migration flag as soon as a saved value has been inspected,
    /// whatever that value is. The memoized rank is dropped after an upgrade
    /// on a best-effort basis.
    pub fn migrate_if_needed(&self) -> Result<MigrationOutcome, AdvisorError> {
        let settings = self.settings();

        if settings.is_migrated()? {
            return Ok(MigrationOutcome::AlreadyMigrated);
        }

        let Some(saved) = settings.saved_max_age()? else {
            tracing::debug!("no saved max-age; deferring legacy migration");
            return Ok(MigrationOutcome::NothingSaved);
        };

        settings.mark_migrated()?;

        // Only an integer exactly equal to the legacy default is promoted; a
        // string or fractional value was shaped by hand.
        let legacy = self.policy.legacy_default();
        if settings.saved_integer_max_age()? != Some(legacy) {
            tracing::info!(max_age = saved, "saved max-age kept; migration flag set");
            return Ok(MigrationOutcome::Kept { max_age: saved });
        }

        let recommended = self.recommended_max_age();
        settings.save_max_age(recommended)?;
        self.forget_rank();

        tracing::info!(
            from = legacy,
            to = recommended,
            "promoted legacy max-age to recommendation"
        );

        Ok(MigrationOutcome::Upgraded {
            from: legacy,
            to: recommended,
        })
    }
}
