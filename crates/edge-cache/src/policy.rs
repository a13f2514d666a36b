//! Max-age recommendation policy.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One week, the platform-recommended max-age.
pub const WEEK_IN_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Max-age sites were created with before the one-week recommendation.
pub const LEGACY_MAX_AGE: u64 = 600;

/// Hook receiving the built-in recommendation and returning the effective one.
pub type MaxAgeOverride = Arc<dyn Fn(u64) -> u64 + Send + Sync>;

/// Source of the recommended and legacy max-age values.
///
/// The recommendation is computed on every call so that a hook installed by
/// the host always takes effect.
#[derive(Clone)]
pub struct MaxAgePolicy {
    legacy_default: u64,
    override_hook: Option<MaxAgeOverride>,
}

impl Default for MaxAgePolicy {
    fn default() -> Self {
        Self {
            legacy_default: LEGACY_MAX_AGE,
            override_hook: None,
        }
    }
}

impl fmt::Debug for MaxAgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxAgePolicy")
            .field("legacy_default", &self.legacy_default)
            .field("recommended", &self.recommended_max_age())
            .field("overridden", &self.override_hook.is_some())
            .finish()
    }
}

impl MaxAgePolicy {
    /// Create the default policy (one week recommended, 600s legacy).
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a hook that overrides the recommended max-age.
    pub fn with_override<F>(mut self, hook: F) -> Self
    where
        F: Fn(u64) -> u64 + Send + Sync + 'static,
    {
        self.override_hook = Some(Arc::new(hook));
        self
    }

    /// Recommend a fixed number of seconds instead of one week.
    pub fn with_fixed_recommendation(self, seconds: u64) -> Self {
        self.with_override(move |_| seconds)
    }

    /// Set the legacy default promoted by the migration.
    pub fn with_legacy_default(mut self, seconds: u64) -> Self {
        self.legacy_default = seconds;
        self
    }

    /// Recommended max-age in seconds.
    pub fn recommended_max_age(&self) -> u64 {
        match &self.override_hook {
            Some(hook) => hook(WEEK_IN_SECONDS),
            None => WEEK_IN_SECONDS,
        }
    }

    /// Legacy default max-age in seconds.
    pub fn legacy_default(&self) -> u64 {
        self.legacy_default
    }

    /// How long a computed rank stays memoized.
    pub fn rank_ttl(&self) -> Duration {
        Duration::from_secs(WEEK_IN_SECONDS)
    }

    /// Generate the Cache-Control header an edge would send for `max_age`.
    pub fn cache_control_header(max_age: u64) -> String {
        if max_age == 0 {
            return "no-store".to_string();
        }
        format!("public, max-age={}", max_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_recommendation_is_one_week() {
        let policy = MaxAgePolicy::new();
        assert_eq!(policy.recommended_max_age(), 604_800);
        assert_eq!(policy.legacy_default(), 600);
        assert_eq!(policy.rank_ttl(), Duration::from_secs(604_800));
    }

    #[test]
    fn test_override_receives_builtin_value() {
        let policy = MaxAgePolicy::new().with_override(|week| week * 2);
        assert_eq!(policy.recommended_max_age(), 1_209_600);
    }

    #[test]
    fn test_fixed_recommendation() {
        let policy = MaxAgePolicy::new().with_fixed_recommendation(3 * 86_400);
        assert_eq!(policy.recommended_max_age(), 259_200);
        // The rank TTL stays pinned to one week.
        assert_eq!(policy.rank_ttl(), Duration::from_secs(WEEK_IN_SECONDS));
    }

    #[test]
    fn test_cache_control_header() {
        assert_eq!(
            MaxAgePolicy::cache_control_header(604_800),
            "public, max-age=604800"
        );
        assert_eq!(MaxAgePolicy::cache_control_header(0), "no-store");
    }

    #[test]
    fn test_debug_shows_effective_value() {
        let policy = MaxAgePolicy::new().with_fixed_recommendation(60);
        let debug = format!("{:?}", policy);
        assert!(debug.contains("recommended: 60"));
        assert!(debug.contains("overridden: true"));
    }
}
