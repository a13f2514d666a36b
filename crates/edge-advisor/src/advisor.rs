//! The advisor facade and its collaborators.

use std::fmt;
use std::sync::Arc;

use edge_cache::{EphemeralCache, MaxAgePolicy};
use edge_core::{AdvisorConfig, SettingsStore};
use semver::Version;

use crate::error::AdvisorError;
use crate::humanize::{HumanTimeDiff, Humanizer};
use crate::notice::NoticeKind;
use crate::settings::{MaxAgeSettings, NoticeLedger};

/// Hook deciding whether a notice kind is silenced. Returning `true` suppresses.
pub type NoticeSuppression = Arc<dyn Fn(NoticeKind) -> bool + Send + Sync>;

/// Evaluates the site's max-age against the recommendation and decides which
/// operator notices to show.
///
/// All state lives in the injected settings store and rank cache; the advisor
/// itself is cheap to build per request.
pub struct MaxAgeAdvisor {
    pub(crate) store: Arc<dyn SettingsStore>,
    pub(crate) cache: Arc<dyn EphemeralCache>,
    pub(crate) policy: MaxAgePolicy,
    pub(crate) config: AdvisorConfig,
    pub(crate) min_integration_version: Version,
    pub(crate) humanizer: Arc<dyn Humanizer>,
    pub(crate) suppression: Option<NoticeSuppression>,
}

impl fmt::Debug for MaxAgeAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxAgeAdvisor")
            .field("policy", &self.policy)
            .field("min_integration_version", &self.min_integration_version)
            .field("notices_disabled", &self.config.notices.disabled)
            .field("suppression_hook", &self.suppression.is_some())
            .finish()
    }
}

impl MaxAgeAdvisor {
    /// Create an advisor with the default policy and configuration.
    pub fn new(store: Arc<dyn SettingsStore>, cache: Arc<dyn EphemeralCache>) -> Self {
        Self {
            store,
            cache,
            policy: MaxAgePolicy::new(),
            config: AdvisorConfig::default(),
            min_integration_version: Version::new(1, 4, 0),
            humanizer: Arc::new(HumanTimeDiff),
            suppression: None,
        }
    }

    /// Create an advisor from a loaded configuration file.
    pub fn from_config(
        store: Arc<dyn SettingsStore>,
        cache: Arc<dyn EphemeralCache>,
        config: AdvisorConfig,
    ) -> Result<Self, AdvisorError> {
        let min_integration_version = config
            .min_integration_version()
            .map_err(|e| AdvisorError::Config(format!("{:#}", e)))?;

        let mut policy = MaxAgePolicy::new().with_legacy_default(config.max_age.legacy_default);
        if let Some(seconds) = config.max_age.recommended_override {
            policy = policy.with_fixed_recommendation(seconds);
        }

        Ok(Self {
            policy,
            config,
            min_integration_version,
            ..Self::new(store, cache)
        })
    }

    /// Replace the max-age policy (e.g. to install an override hook).
    pub fn with_policy(mut self, policy: MaxAgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the duration humanizer.
    pub fn with_humanizer(mut self, humanizer: impl Humanizer + 'static) -> Self {
        self.humanizer = Arc::new(humanizer);
        self
    }

    /// Install a per-kind notice suppression hook.
    pub fn with_suppression<F>(mut self, hook: F) -> Self
    where
        F: Fn(NoticeKind) -> bool + Send + Sync + 'static,
    {
        self.suppression = Some(Arc::new(hook));
        self
    }

    /// Turn the global notice kill-switch on or off.
    pub fn with_notices_disabled(mut self, disabled: bool) -> Self {
        self.config.notices.disabled = disabled;
        self
    }

    /// The active max-age policy.
    pub fn policy(&self) -> &MaxAgePolicy {
        &self.policy
    }

    /// The active configuration.
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Typed view over the settings store.
    pub fn settings(&self) -> MaxAgeSettings<'_> {
        MaxAgeSettings::new(self.store.as_ref())
    }

    /// Once-only notice flags for one user.
    pub fn ledger(&self, user: edge_core::UserId) -> NoticeLedger<'_> {
        NoticeLedger::new(self.store.as_ref(), user)
    }

    /// Recommended max-age in seconds, honouring any override.
    pub fn recommended_max_age(&self) -> u64 {
        self.policy.recommended_max_age()
    }

    /// Current max-age in seconds; the recommendation if none was ever saved.
    pub fn current_max_age(&self) -> Result<u64, AdvisorError> {
        Ok(self
            .settings()
            .saved_max_age()?
            .unwrap_or_else(|| self.recommended_max_age()))
    }

    /// Describe a duration for operators.
    pub fn humanized(&self, seconds: u64) -> String {
        self.humanizer.humanize(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[test]
    fn test_current_defaults_to_recommended() {
        let fx = Fixture::new();
        assert_eq!(fx.advisor.current_max_age().unwrap(), 604_800);
        assert_eq!(fx.advisor.recommended_max_age(), 604_800);

        fx.save_max_age(300);
        assert_eq!(fx.advisor.current_max_age().unwrap(), 300);
    }

    #[test]
    fn test_from_config_applies_override_and_legacy() {
        let mut config = AdvisorConfig::default();
        config.max_age.recommended_override = Some(259_200);
        config.max_age.legacy_default = 900;
        config.max_age.min_integration_version = "2.0".to_string();

        let fx = Fixture::new();
        let advisor =
            MaxAgeAdvisor::from_config(fx.store.clone(), fx.cache.clone(), config).unwrap();

        assert_eq!(advisor.recommended_max_age(), 259_200);
        assert_eq!(advisor.policy().legacy_default(), 900);
        assert_eq!(advisor.min_integration_version, Version::new(2, 0, 0));
    }

    #[test]
    fn test_from_config_rejects_bad_version() {
        let mut config = AdvisorConfig::default();
        config.max_age.min_integration_version = "latest".to_string();

        let fx = Fixture::new();
        let err = MaxAgeAdvisor::from_config(fx.store.clone(), fx.cache.clone(), config)
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Config(_)));
    }

    #[test]
    fn test_humanized_uses_injected_humanizer() {
        let fx = Fixture::new();
        assert_eq!(fx.advisor.humanized(600), "10 mins");

        let advisor = fx.rebuild().with_humanizer(|s: u64| format!("{}s", s));
        assert_eq!(advisor.humanized(600), "600s");
    }
}
