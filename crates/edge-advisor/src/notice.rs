//! Operator notice selection.
//!
//! Every branch is derived fresh from the request context, the rank and the
//! stored flags. Nothing about which notice was shown is kept in memory.

use std::fmt;

use edge_core::{Integration, RequestContext};
use semver::Version;
use serde::Serialize;

use crate::advisor::MaxAgeAdvisor;
use crate::error::AdvisorError;
use crate::rank::DeviationRank;
use crate::settings::SeenNotice;

/// How prominently a notice is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Escalation for a non-zero rank: 1 is info, 2-3 warning, above 3 error.
    pub fn for_rank(rank: DeviationRank) -> Self {
        match rank.value() {
            0 | 1 => Self::Info,
            2 | 3 => Self::Warning,
            _ => Self::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Every notice the advisor can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// No platform integration detected.
    MissingIntegration,
    /// Integration older than the supported minimum.
    OutdatedIntegration,
    /// Max-age below recommendation, on the settings view.
    LowMaxAge,
    /// Max-age below recommendation, anywhere else. Shown once per user.
    GlobalLowMaxAge,
    /// Legacy max-age was inspected by the migration. Shown once per user.
    MaxAgeUpdated,
}

impl NoticeKind {
    pub const ALL: [NoticeKind; 5] = [
        NoticeKind::MissingIntegration,
        NoticeKind::OutdatedIntegration,
        NoticeKind::LowMaxAge,
        NoticeKind::GlobalLowMaxAge,
        NoticeKind::MaxAgeUpdated,
    ];

    /// Stable name, used in logs and by the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingIntegration => "missing_integration",
            Self::OutdatedIntegration => "outdated_integration",
            Self::LowMaxAge => "low_max_age",
            Self::GlobalLowMaxAge => "global_low_max_age",
            Self::MaxAgeUpdated => "max_age_updated",
        }
    }

    /// The per-user flag guarding this notice, for once-only kinds.
    pub fn seen_flag(&self) -> Option<SeenNotice> {
        match self {
            Self::GlobalLowMaxAge => Some(SeenNotice::GlobalLowMaxAge),
            Self::MaxAgeUpdated => Some(SeenNotice::MaxAgeUpdated),
            _ => None,
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notice ready for the host to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub severity: Severity,
    /// Whether the operator may close it.
    pub dismissible: bool,
    /// Rank the notice was built from, for max-age notices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<DeviationRank>,
}

impl Notice {
    fn new(kind: NoticeKind, severity: Severity, dismissible: bool, message: String) -> Self {
        Self {
            kind,
            message,
            severity,
            dismissible,
            rank: None,
        }
    }

    fn with_rank(mut self, rank: DeviationRank) -> Self {
        self.rank = Some(rank);
        self
    }
}

impl MaxAgeAdvisor {
    /// Check if `kind` is silenced by the kill-switch or the suppression hook.
    pub fn is_suppressed(&self, kind: NoticeKind) -> bool {
        self.config.notices.disabled || self.suppression.as_ref().is_some_and(|hook| hook(kind))
    }

    /// The single most important notice for this request, if any.
    ///
    /// Integration problems and low max-age come first; the post-migration
    /// acknowledgment only shows when none of those apply. Store failures
    /// skip the notice rather than fail the request.
    pub fn select_notice(&self, ctx: &RequestContext) -> Option<Notice> {
        soften(ctx, self.integration_notice(ctx))
            .or_else(|| soften(ctx, self.max_age_updated_notice(ctx)))
    }

    /// Every notice due for this request, in display order.
    pub fn collect_notices(&self, ctx: &RequestContext) -> Vec<Notice> {
        [
            soften(ctx, self.integration_notice(ctx)),
            soften(ctx, self.max_age_updated_notice(ctx)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn integration_notice(&self, ctx: &RequestContext) -> Result<Option<Notice>, AdvisorError> {
        match &ctx.integration {
            Integration::Missing => Ok(self.missing_integration_notice()),
            Integration::Installed { version }
                if ctx.integration.is_outdated(&self.min_integration_version) =>
            {
                Ok(self.outdated_integration_notice(ctx, version))
            }
            Integration::Installed { .. } => self.low_max_age_notice(ctx),
        }
    }

    /// Recommend installing the platform integration.
    pub fn missing_integration_notice(&self) -> Option<Notice> {
        if self.is_suppressed(NoticeKind::MissingIntegration) {
            return None;
        }

        Some(Notice::new(
            NoticeKind::MissingIntegration,
            Severity::Error,
            true,
            format!(
                "The edge cache works best on the hosting platform. If you are working inside \
                 a platform environment, ensure your site is using the platform integration ({}).",
                self.config.notices.integration_url
            ),
        ))
    }

    /// Ask for an integration update. Settings view only.
    pub fn outdated_integration_notice(
        &self,
        ctx: &RequestContext,
        found: &Version,
    ) -> Option<Notice> {
        if self.is_suppressed(NoticeKind::OutdatedIntegration) || !ctx.screen.is_settings() {
            return None;
        }

        let hint = if ctx.composer_managed {
            "If you are using Composer, you can update the integration by running `composer update`."
        } else {
            "You should apply updates from the platform dashboard to get the latest version of the integration."
        };

        Some(Notice::new(
            NoticeKind::OutdatedIntegration,
            Severity::Warning,
            true,
            format!(
                "You appear to have an old version of the platform integration ({}). {} or above \
                 expected but {} found. {}",
                self.config.notices.integration_url, self.min_integration_version, found, hint
            ),
        ))
    }

    /// Warn that max-age is below the recommendation.
    ///
    /// On the settings view the notice is dismissible and escalates with the
    /// rank. Elsewhere it is a plain warning shown once per user; the user's
    /// flag is set as soon as it is produced.
    pub fn low_max_age_notice(&self, ctx: &RequestContext) -> Result<Option<Notice>, AdvisorError> {
        let on_settings = ctx.screen.is_settings();
        let kind = if on_settings {
            NoticeKind::LowMaxAge
        } else {
            NoticeKind::GlobalLowMaxAge
        };

        if self.is_suppressed(kind) {
            return Ok(None);
        }

        let Some(viewer) = ctx.manager() else {
            return Ok(None);
        };

        let ledger = self.ledger(viewer.id);
        if !on_settings && ledger.has_seen(SeenNotice::GlobalLowMaxAge)? {
            return Ok(None);
        }

        let rank = self.current_rank();
        if rank.is_optimal() {
            return Ok(None);
        }

        let current = self.current_max_age()?;
        if current == self.policy.legacy_default() && !self.settings().is_migrated()? {
            tracing::debug!(current, "legacy max-age awaiting migration; no notice");
            return Ok(None);
        }

        let recommended = self.recommended_max_age();

        if on_settings {
            let very_low = if rank.is_very_low() {
                " This is a very low value and may not be optimal for your site."
            } else {
                ""
            };

            let notice = Notice::new(
                kind,
                Severity::for_rank(rank),
                true,
                format!(
                    "The cache max-age is currently set to {}.{} Consider increasing the cache \
                     max-age to at least {}.",
                    self.humanized(current),
                    very_low,
                    self.humanized(recommended)
                ),
            )
            .with_rank(rank);
            return Ok(Some(notice));
        }

        let notice = Notice::new(
            kind,
            Severity::Warning,
            false,
            format!(
                "Your site's cache max-age is set below the recommendation ({}). Visit the cache \
                 settings page ({}) to update the setting.",
                self.humanized(recommended),
                self.config.notices.settings_url
            ),
        )
        .with_rank(rank);

        ledger.mark_seen(SeenNotice::GlobalLowMaxAge)?;
        Ok(Some(notice))
    }

    /// Tell a manager, once, that the migration looked at their max-age.
    pub fn max_age_updated_notice(
        &self,
        ctx: &RequestContext,
    ) -> Result<Option<Notice>, AdvisorError> {
        if self.is_suppressed(NoticeKind::MaxAgeUpdated) {
            return Ok(None);
        }

        let Some(viewer) = ctx.manager() else {
            return Ok(None);
        };

        let ledger = self.ledger(viewer.id);
        if ledger.has_seen(SeenNotice::MaxAgeUpdated)? || !self.settings().is_migrated()? {
            return Ok(None);
        }

        let notice = Notice::new(
            NoticeKind::MaxAgeUpdated,
            Severity::Info,
            false,
            format!(
                "The edge cache max-age has been updated. The previous value was {}. The new \
                 value is {}. For more information, refer to the documentation ({}).",
                self.humanized(self.policy.legacy_default()),
                self.humanized(self.current_max_age()?),
                self.config.notices.docs_url
            ),
        );

        ledger.mark_seen(SeenNotice::MaxAgeUpdated)?;
        Ok(Some(notice))
    }
}

fn soften(ctx: &RequestContext, result: Result<Option<Notice>, AdvisorError>) -> Option<Notice> {
    result.unwrap_or_else(|err| {
        tracing::warn!(
            request_id = %ctx.request_id,
            error = %err,
            "skipping notice after settings failure"
        );
        None
    })
}
