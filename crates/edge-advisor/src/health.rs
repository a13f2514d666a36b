//! Max-age status for diagnostics tooling.

use serde::Serialize;

use crate::advisor::MaxAgeAdvisor;
use crate::error::AdvisorError;

/// Identifier diagnostics tooling files the max-age test under.
pub const HEALTH_TEST_ID: &str = "edge_cache_max_age";

/// Overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Good,
    Recommended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Blue,
    Orange,
    Red,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub color: BadgeColor,
}

/// Registration entry for the diagnostics test list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub label: String,
    pub test: String,
}

/// Result of the max-age diagnostics test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub label: String,
    pub status: HealthStatus,
    pub badge: Badge,
    pub description: String,
    pub test: String,
}

impl MaxAgeAdvisor {
    /// Entry to register with the diagnostics subsystem.
    pub fn health_check(&self) -> HealthCheck {
        HealthCheck {
            label: "Edge Cache".to_string(),
            test: HEALTH_TEST_ID.to_string(),
        }
    }

    /// Build the max-age diagnostics report. Reads state only; the rank is
    /// never memoized from here.
    pub fn health_report(&self) -> Result<HealthReport, AdvisorError> {
        let current = self.current_max_age()?;
        let recommended = self.recommended_max_age();
        let current_human = self.humanized(current);
        let recommended_human = self.humanized(recommended);

        let report = if current < recommended {
            let color = if self.peek_rank().is_very_low() {
                BadgeColor::Red
            } else {
                BadgeColor::Orange
            };

            HealthReport {
                label: "Edge Cache Max-Age".to_string(),
                status: HealthStatus::Recommended,
                badge: performance_badge(color),
                description: format!(
                    "The edge cache max-age is currently set to {} ({} seconds). We recommend \
                     increasing to {} ({} seconds).",
                    current_human, current, recommended_human, recommended
                ),
                test: HEALTH_TEST_ID.to_string(),
            }
        } else {
            HealthReport {
                label: format!("Edge Cache Max-Age set to {}", current_human),
                status: HealthStatus::Good,
                badge: performance_badge(BadgeColor::Blue),
                description: format!(
                    "The edge cache max-age is currently set to {} ({} seconds). Our \
                     recommendation is {} ({} seconds) or more.\nView the cache configuration \
                     guide ({}) for more information.",
                    current_human,
                    current,
                    recommended_human,
                    recommended,
                    self.config.notices.guide_url
                ),
                test: HEALTH_TEST_ID.to_string(),
            }
        };

        tracing::debug!(status = ?report.status, current, recommended, "built health report");
        Ok(report)
    }
}

fn performance_badge(color: BadgeColor) -> Badge {
    Badge {
        label: "Performance".to_string(),
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingStore, Fixture};
    use edge_cache::MaxAgePolicy;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_very_low_is_red() {
        let fx = Fixture::new();
        fx.save_max_age(300);

        let report = fx.advisor.health_report().unwrap();
        assert_eq!(report.status, HealthStatus::Recommended);
        assert_eq!(report.badge.color, BadgeColor::Red);
        assert_eq!(report.badge.label, "Performance");
        assert!(report.description.contains("5 mins (300 seconds)"));
        assert!(report.description.contains("1 week (604800 seconds)"));
        assert_eq!(report.test, HEALTH_TEST_ID);
    }

    #[test]
    fn test_moderately_low_is_orange() {
        let fx = Fixture::new();
        fx.save_max_age(432_000);

        let report = fx.advisor.health_report().unwrap();
        assert_eq!(report.status, HealthStatus::Recommended);
        assert_eq!(report.badge.color, BadgeColor::Orange);
        assert!(report.description.contains("5 days (432000 seconds)"));
    }

    #[test]
    fn test_recommended_value_is_good() {
        let fx = Fixture::new();

        let report = fx.advisor.health_report().unwrap();
        assert_eq!(report.status, HealthStatus::Good);
        assert_eq!(report.badge.color, BadgeColor::Blue);
        assert_eq!(report.label, "Edge Cache Max-Age set to 1 week");
        assert!(report
            .description
            .contains(&fx.advisor.config().notices.guide_url));
    }

    #[test]
    fn test_override_moves_the_bar() {
        let fx = Fixture::new();
        fx.save_max_age(86_400);

        let advisor = fx
            .rebuild()
            .with_policy(MaxAgePolicy::new().with_fixed_recommendation(3_600));
        let report = advisor.health_report().unwrap();
        assert_eq!(report.status, HealthStatus::Good);
        assert!(report.description.contains("1 hour (3600 seconds) or more"));
    }

    #[test]
    fn test_report_has_no_side_effects() {
        for max_age in [604_800, 432_000, 300] {
            let fx = Fixture::new();
            fx.save_max_age(max_age);
            fx.advisor.health_report().unwrap();
            assert!(fx.cached_rank().is_none(), "max_age = {}", max_age);
            assert!(fx.cache.is_empty());
        }
    }

    #[test]
    fn test_store_failure_is_reported() {
        let fx = Fixture::new();
        let advisor = crate::MaxAgeAdvisor::new(Arc::new(FailingStore), fx.cache.clone());
        assert!(advisor.health_report().is_err());
    }

    #[test]
    fn test_report_serializes_lowercase() {
        let fx = Fixture::new();
        fx.save_max_age(300);

        let value = serde_json::to_value(fx.advisor.health_report().unwrap()).unwrap();
        assert_eq!(value["status"], json!("recommended"));
        assert_eq!(value["badge"]["color"], json!("red"));
        assert_eq!(value["test"], json!("edge_cache_max_age"));
    }

    #[test]
    fn test_health_check_registration() {
        let fx = Fixture::new();
        let check = fx.advisor.health_check();
        assert_eq!(check.test, HEALTH_TEST_ID);
    }
}
