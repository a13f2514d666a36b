//! Request context for a single admin page render.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use semver::Version;
use serde::{Deserialize, Serialize};

/// Screen identifier of the cache settings view.
pub const SETTINGS_SCREEN_ID: &str = "settings_page_edge-cache";

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        let id = format!(
            "{:x}-{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            next_sequence()
        );
        Self(id)
    }
}

fn next_sequence() -> u32 {
    static SEQUENCE: AtomicU32 = AtomicU32::new(0);
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an operator account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl UserId {
    /// Get the raw numeric ID.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signed-in user looking at the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// Account ID.
    pub id: UserId,
    /// Whether the account may change the cache settings.
    pub can_manage_settings: bool,
}

impl Viewer {
    /// A viewer allowed to manage the cache settings.
    pub fn manager(id: u64) -> Self {
        Self {
            id: UserId(id),
            can_manage_settings: true,
        }
    }

    /// A viewer without permission to manage the cache settings.
    pub fn read_only(id: u64) -> Self {
        Self {
            id: UserId(id),
            can_manage_settings: false,
        }
    }
}

/// Which admin view is being rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "id")]
pub enum Screen {
    /// The dedicated cache settings view.
    Settings,
    /// Any other view, by screen ID.
    Other(String),
    /// Screen could not be determined.
    Unknown,
}

impl Screen {
    /// Classify a raw screen ID.
    pub fn from_id(id: &str) -> Self {
        if id == SETTINGS_SCREEN_ID {
            Self::Settings
        } else {
            Self::Other(id.to_string())
        }
    }

    /// Check if this is the cache settings view.
    pub fn is_settings(&self) -> bool {
        matches!(self, Self::Settings)
    }
}

/// State of the platform integration the cache settings belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integration {
    /// No integration detected.
    Missing,
    /// Integration present at the given version.
    Installed { version: Version },
}

impl Integration {
    /// Build from a version string such as `1.4.0` or `1.5`.
    pub fn installed(version: &str) -> Result<Self, semver::Error> {
        Ok(Self::Installed {
            version: parse_version_lenient(version)?,
        })
    }

    /// Check if the integration is present but older than `minimum`.
    pub fn is_outdated(&self, minimum: &Version) -> bool {
        match self {
            Self::Missing => false,
            Self::Installed { version } => version < minimum,
        }
    }

    /// Installed version, if any.
    pub fn version(&self) -> Option<&Version> {
        match self {
            Self::Missing => None,
            Self::Installed { version } => Some(version),
        }
    }
}

/// Parse a version, padding missing minor/patch components with zero.
pub fn parse_version_lenient(raw: &str) -> Result<Version, semver::Error> {
    let trimmed = raw.trim().trim_start_matches('v');
    let core_len = trimmed
        .find(|c| c == '-' || c == '+')
        .unwrap_or(trimmed.len());
    let (core, rest) = trimmed.split_at(core_len);

    let mut parts: Vec<&str> = core.split('.').collect();
    while parts.len() < 3 {
        parts.push("0");
    }

    Version::parse(&format!("{}{}", parts.join("."), rest))
}

/// Everything the notice selector needs to know about one page render.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// View being rendered.
    pub screen: Screen,
    /// Signed-in user, if any.
    pub viewer: Option<Viewer>,
    /// Platform integration state.
    pub integration: Integration,
    /// Whether the site is managed with Composer.
    pub composer_managed: bool,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(screen: Screen, integration: Integration) -> Self {
        Self {
            request_id: RequestId::generate(),
            screen,
            viewer: None,
            integration,
            composer_managed: false,
        }
    }

    /// Set the signed-in user.
    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = Some(viewer);
        self
    }

    /// Mark the site as Composer-managed.
    pub fn with_composer(mut self, composer_managed: bool) -> Self {
        self.composer_managed = composer_managed;
        self
    }

    /// The viewer, if signed in and allowed to manage the cache settings.
    pub fn manager(&self) -> Option<&Viewer> {
        self.viewer.as_ref().filter(|v| v.can_manage_settings)
    }
}
