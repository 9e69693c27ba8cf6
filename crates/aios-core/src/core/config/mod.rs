use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use aios_domain::{canonicalize, Result};

pub mod context;

pub const WORKSPACE_DIR_ENV: &str = "AIOS_WORKSPACE_DIR";
pub const WATCH_INTERVAL_ENV: &str = "AIOS_WATCH_INTERVAL_MS";
pub const DEFAULT_WORKSPACE_DIR: &str = "./.aios";
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub trace: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) workspace: WorkspaceConfig,
    pub(crate) watch: WatchConfig,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        let snapshot = EnvSnapshot::capture();
        Self::from_snapshot(&snapshot)
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot) -> Result<Self> {
        let raw_root = snapshot
            .var(WORKSPACE_DIR_ENV)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_WORKSPACE_DIR);
        Ok(Self {
            workspace: WorkspaceConfig::new(canonicalize(raw_root)?),
            watch: WatchConfig {
                interval: WatchConfig::interval_from(snapshot.var(WATCH_INTERVAL_ENV)),
            },
        })
    }

    /// Configuration rooted at an explicit workspace directory.
    pub fn for_root(root: &Path) -> Result<Self> {
        Ok(Self {
            workspace: WorkspaceConfig::new(canonicalize(&root.to_string_lossy())?),
            watch: WatchConfig::default(),
        })
    }

    #[must_use]
    pub fn workspace(&self) -> &WorkspaceConfig {
        &self.workspace
    }

    #[must_use]
    pub fn watch(&self) -> &WatchConfig {
        &self.watch
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub root: PathBuf,
}

impl WorkspaceConfig {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    #[must_use]
    pub fn inventory_path(&self) -> PathBuf {
        self.projects_dir().join("inventory.json")
    }

    #[must_use]
    pub fn links_root(&self) -> PathBuf {
        self.projects_dir().join("links")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    pub interval: Duration,
}

impl WatchConfig {
    /// Non-positive or unparsable values fall back to the default interval.
    #[must_use]
    pub fn interval_from(raw: Option<&str>) -> Duration {
        raw.and_then(|value| value.trim().parse::<i64>().ok())
            .and_then(|millis| u64::try_from(millis).ok())
            .filter(|millis| *millis > 0)
            .map_or(DEFAULT_WATCH_INTERVAL, Duration::from_millis)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_WATCH_INTERVAL,
        }
    }
}
