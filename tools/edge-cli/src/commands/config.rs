//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use edge_core::{generate_default_config, parse_version_lenient, AdvisorConfig};

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    ctx.output.kv("state", &ctx.state_path.display().to_string());

    ctx.output.info("[max_age]");
    let max_age = &ctx.config.max_age;
    ctx.output.kv(
        "recommended_override",
        &max_age
            .recommended_override
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(none)".to_string()),
    );
    ctx.output.kv("legacy_default", &max_age.legacy_default.to_string());
    ctx.output
        .kv("min_integration_version", &max_age.min_integration_version);

    ctx.output.info("[notices]");
    let notices = &ctx.config.notices;
    ctx.output.kv("disabled", &notices.disabled.to_string());
    ctx.output.kv("settings_url", &notices.settings_url);
    ctx.output.kv("integration_url", &notices.integration_url);
    ctx.output.kv("docs_url", &notices.docs_url);
    ctx.output.kv("guide_url", &notices.guide_url);

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = &ctx.config_path else {
        bail!("No config file found. Run `edge config init` to create one.");
    };

    let mut config = AdvisorConfig::load(path)?;
    set_config_value(&mut config, key, value)?;
    config.save(path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}

fn check_config(config: &AdvisorConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if parse_version_lenient(&config.max_age.min_integration_version).is_err() {
        errors.push(format!(
            "max_age.min_integration_version '{}' is not a version",
            config.max_age.min_integration_version
        ));
    }

    match config.max_age.recommended_override {
        Some(0) => errors.push("max_age.recommended_override must be above 0".to_string()),
        Some(seconds) if seconds <= config.max_age.legacy_default => warnings.push(format!(
            "max_age.recommended_override ({}) does not exceed legacy_default ({}); \
             the migration would not raise max-age",
            seconds, config.max_age.legacy_default
        )),
        _ => {}
    }

    if config.notices.disabled {
        warnings.push("notices.disabled is set; no notice will be shown".to_string());
    }

    for (key, url) in [
        ("notices.settings_url", &config.notices.settings_url),
        ("notices.integration_url", &config.notices.integration_url),
        ("notices.docs_url", &config.notices.docs_url),
        ("notices.guide_url", &config.notices.guide_url),
    ] {
        if url.trim().is_empty() {
            errors.push(format!("{} must not be empty", key));
        }
    }

    (errors, warnings)
}

fn get_config_value(config: &AdvisorConfig, key: &str) -> Result<serde_json::Value> {
    let parts: Vec<&str> = key.split('.').collect();

    let value = match parts.as_slice() {
        ["max_age", "recommended_override"] => serde_json::json!(config.max_age.recommended_override),
        ["max_age", "legacy_default"] => config.max_age.legacy_default.into(),
        ["max_age", "min_integration_version"] => {
            config.max_age.min_integration_version.clone().into()
        }
        ["notices", "disabled"] => config.notices.disabled.into(),
        ["notices", "settings_url"] => config.notices.settings_url.clone().into(),
        ["notices", "integration_url"] => config.notices.integration_url.clone().into(),
        ["notices", "docs_url"] => config.notices.docs_url.clone().into(),
        ["notices", "guide_url"] => config.notices.guide_url.clone().into(),
        _ => bail!("Unknown config key: {}", key),
    };

    Ok(value)
}

fn set_config_value(config: &mut AdvisorConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["max_age", "recommended_override"] => {
            config.max_age.recommended_override = match value {
                "" | "none" => None,
                v => Some(v.parse().with_context(|| format!("Invalid seconds: {}", v))?),
            }
        }
        ["max_age", "legacy_default"] => {
            config.max_age.legacy_default = value
                .parse()
                .with_context(|| format!("Invalid seconds: {}", value))?
        }
        ["max_age", "min_integration_version"] => {
            parse_version_lenient(value)
                .with_context(|| format!("Invalid version: {}", value))?;
            config.max_age.min_integration_version = value.to_string();
        }
        ["notices", "disabled"] => {
            config.notices.disabled = value
                .parse()
                .with_context(|| format!("Expected true or false, got: {}", value))?
        }
        ["notices", "settings_url"] => config.notices.settings_url = value.to_string(),
        ["notices", "integration_url"] => config.notices.integration_url = value.to_string(),
        ["notices", "docs_url"] => config.notices.docs_url = value.to_string(),
        ["notices", "guide_url"] => config.notices.guide_url = value.to_string(),
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_known_keys() {
        let config = AdvisorConfig::default();
        assert_eq!(
            get_config_value(&config, "max_age.legacy_default").unwrap(),
            json!(600)
        );
        assert_eq!(
            get_config_value(&config, "max_age.recommended_override").unwrap(),
            json!(null)
        );
        assert_eq!(
            get_config_value(&config, "notices.disabled").unwrap(),
            json!(false)
        );
        assert!(get_config_value(&config, "notices.colour").is_err());
    }

    #[test]
    fn test_set_parses_values() {
        let mut config = AdvisorConfig::default();

        set_config_value(&mut config, "max_age.recommended_override", "259200").unwrap();
        assert_eq!(config.max_age.recommended_override, Some(259_200));
        set_config_value(&mut config, "max_age.recommended_override", "none").unwrap();
        assert_eq!(config.max_age.recommended_override, None);

        set_config_value(&mut config, "notices.disabled", "true").unwrap();
        assert!(config.notices.disabled);

        assert!(set_config_value(&mut config, "notices.disabled", "yes").is_err());
        assert!(set_config_value(&mut config, "max_age.min_integration_version", "x.y").is_err());
        assert!(set_config_value(&mut config, "max_age.legacy_default", "-1").is_err());
    }

    #[test]
    fn test_check_config() {
        let (errors, warnings) = check_config(&AdvisorConfig::default());
        assert!(errors.is_empty());
        assert!(warnings.is_empty());

        let mut config = AdvisorConfig::default();
        config.max_age.recommended_override = Some(300);
        config.notices.docs_url = " ".to_string();
        let (errors, warnings) = check_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_set_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge-advisor.toml");
        fs::write(&path, generate_default_config()).unwrap();

        let mut config = AdvisorConfig::load(&path).unwrap();
        set_config_value(&mut config, "max_age.legacy_default", "900").unwrap();
        config.save(&path).unwrap();

        assert_eq!(AdvisorConfig::load(&path).unwrap().max_age.legacy_default, 900);
    }
}
