//! Advisor configuration.

use std::path::Path;

use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::context::parse_version_lenient;

/// Top-level advisor configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Max-age evaluation settings.
    #[serde(default)]
    pub max_age: MaxAgeConfig,

    /// Notice rendering settings.
    #[serde(default)]
    pub notices: NoticeConfig,
}

impl AdvisorConfig {
    /// Load config from a file (JSON by extension, TOML otherwise).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Minimum integration version as a parsed semver.
    pub fn min_integration_version(&self) -> Result<Version> {
        parse_version_lenient(&self.max_age.min_integration_version).with_context(|| {
            format!(
                "Invalid min_integration_version: {}",
                self.max_age.min_integration_version
            )
        })
    }
}

/// Max-age evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxAgeConfig {
    /// Replaces the one-week recommendation when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_override: Option<u64>,

    /// Historical default promoted by the legacy migration.
    #[serde(default = "default_legacy_max_age")]
    pub legacy_default: u64,

    /// Integration versions below this get the outdated notice.
    #[serde(default = "default_min_integration_version")]
    pub min_integration_version: String,
}

fn default_legacy_max_age() -> u64 {
    600
}

fn default_min_integration_version() -> String {
    "1.4.0".to_string()
}

impl Default for MaxAgeConfig {
    fn default() -> Self {
        Self {
            recommended_override: None,
            legacy_default: default_legacy_max_age(),
            min_integration_version: default_min_integration_version(),
        }
    }
}

/// Notice settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// Global kill-switch: no notice of any kind when true.
    #[serde(default)]
    pub disabled: bool,

    /// Link to the cache settings view.
    #[serde(default = "default_settings_url")]
    pub settings_url: String,

    /// Where to get the platform integration.
    #[serde(default = "default_integration_url")]
    pub integration_url: String,

    /// Documentation linked from the post-migration notice.
    #[serde(default = "default_docs_url")]
    pub docs_url: String,

    /// Configuration guide linked from the health report.
    #[serde(default = "default_guide_url")]
    pub guide_url: String,
}

fn default_settings_url() -> String {
    "/admin/options-general.php?page=edge-cache".to_string()
}

fn default_integration_url() -> String {
    "https://github.com/pantheon-systems/pantheon-mu-plugin".to_string()
}

fn default_docs_url() -> String {
    "https://docs.pantheon.io/guides/wordpress-configurations/wordpress-cache-plugin".to_string()
}

fn default_guide_url() -> String {
    "https://docs.pantheon.io/guides/wordpress-configurations/wordpress-cache-plugin#pantheon-page-cache-plugin-configuration".to_string()
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            settings_url: default_settings_url(),
            integration_url: default_integration_url(),
            docs_url: default_docs_url(),
            guide_url: default_guide_url(),
        }
    }
}

/// Generate a default edge-advisor.toml config file.
pub fn generate_default_config() -> String {
    r#"# Edge cache max-age advisor configuration

[max_age]
# recommended_override = 259200
legacy_default = 600
min_integration_version = "1.4.0"

[notices]
disabled = false
settings_url = "/admin/options-general.php?page=edge-cache"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.max_age.legacy_default, 600);
        assert_eq!(config.max_age.recommended_override, None);
        assert!(!config.notices.disabled);
        assert_eq!(
            config.min_integration_version().unwrap(),
            Version::new(1, 4, 0)
        );
    }

    #[test]
    fn test_parse_generated_toml() {
        let config: AdvisorConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.max_age.legacy_default, 600);
        assert_eq!(config.notices.docs_url, default_docs_url());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AdvisorConfig = toml::from_str(
            r#"
            [max_age]
            recommended_override = 259200

            [notices]
            disabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.max_age.recommended_override, Some(259200));
        assert_eq!(config.max_age.min_integration_version, "1.4.0");
        assert!(config.notices.disabled);
        assert_eq!(config.notices.settings_url, default_settings_url());
    }

    #[test]
    fn test_load_and_save_roundtrip_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge-advisor.json");

        let mut config = AdvisorConfig::default();
        config.max_age.recommended_override = Some(86400);
        config.save(&path).unwrap();

        let loaded = AdvisorConfig::load(&path).unwrap();
        assert_eq!(loaded.max_age.recommended_override, Some(86400));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = AdvisorConfig::load("/nonexistent/edge-advisor.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_min_version() {
        let mut config = AdvisorConfig::default();
        config.max_age.min_integration_version = "abc".to_string();
        assert!(config.min_integration_version().is_err());
    }
}
