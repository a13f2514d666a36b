//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use edge_advisor::MaxAgeAdvisor;
use edge_core::AdvisorConfig;

use crate::output::Output;
use crate::state::FileStore;

/// Config file names searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["edge-advisor.toml", ".edge-advisor.toml", "edge-advisor.json"];

/// Default state file, relative to the working directory.
pub const DEFAULT_STATE_PATH: &str = ".edge-advisor/state.json";

/// Execution context for CLI commands.
pub struct Context {
    /// Advisor configuration.
    pub config: AdvisorConfig,
    /// Where the configuration was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Settings and cache state file.
    pub state_path: PathBuf,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, state_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (AdvisorConfig::load(path)?, Some(PathBuf::from(path))),
            None => match find_config(&cwd) {
                Some(path) => (AdvisorConfig::load(&path)?, Some(path)),
                None => (AdvisorConfig::default(), None),
            },
        };

        let state_path = resolve(&cwd, state_path.unwrap_or(DEFAULT_STATE_PATH));

        Ok(Self {
            config,
            config_path,
            state_path,
            output,
            cwd,
        })
    }

    /// Build an advisor over the state file.
    pub fn advisor(&self) -> Result<MaxAgeAdvisor> {
        let state = Arc::new(FileStore::open(&self.state_path));
        MaxAgeAdvisor::from_config(state.clone(), state, self.config.clone())
            .context("Failed to build advisor from configuration")
    }

    /// The state file as a raw store.
    pub fn state(&self) -> FileStore {
        FileStore::open(&self.state_path)
    }
}

/// Find a config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".edge-advisor.toml"), "").unwrap();

        let found = find_config(&nested).unwrap();
        assert_eq!(found, dir.path().join(".edge-advisor.toml"));
    }

    #[test]
    fn test_find_config_prefers_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("edge-advisor.toml"), "").unwrap();
        std::fs::write(dir.path().join("edge-advisor.json"), "{}").unwrap();

        assert_eq!(
            find_config(dir.path()).unwrap(),
            dir.path().join("edge-advisor.toml")
        );
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let cwd = Path::new("/srv/site");
        assert_eq!(resolve(cwd, "state.json"), cwd.join("state.json"));
        assert_eq!(resolve(cwd, "/tmp/state.json"), PathBuf::from("/tmp/state.json"));
    }
}
