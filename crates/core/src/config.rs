// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration loaded from `.craizy/config.toml`.
//!
//! ```toml
//! project = "demo"
//!
//! [git]
//! enabled = true
//! worktree_dir = ".craizy/worktrees"
//!
//! [store]
//! path = ".craizy/agents.json"
//!
//! [agents.claude]
//! command = "claude --dangerously-skip-permissions"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the project root holding config, store and worktrees
pub const STATE_DIR: &str = ".craizy";

/// Environment variable naming an alternate config file
pub const CONFIG_ENV: &str = "CRAIZY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub enabled: bool,
    pub worktree_dir: PathBuf,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self { enabled: true, worktree_dir: PathBuf::from(STATE_DIR).join("worktrees") }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: PathBuf::from(STATE_DIR).join("agents.json") }
    }
}

/// Per agent-type settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTypeConfig {
    pub command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name; defaults to the project directory's name
    pub project: Option<String>,
    pub git: GitConfig,
    pub store: StoreConfig,
    pub agents: BTreeMap<String, AgentTypeConfig>,
    /// Directory the config was resolved against
    #[serde(skip)]
    pub project_dir: PathBuf,
}

impl Config {
    /// Load configuration for a project directory.
    ///
    /// Reads `$CRAIZY_CONFIG` if set, else `<project_dir>/.craizy/config.toml`.
    /// A missing file yields defaults.
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => project_dir.join(STATE_DIR).join("config.toml"),
        };
        let mut config = match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text).map_err(|source| ConfigError::Parse { path, source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        config.project_dir = project_dir.to_path_buf();
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn project_name(&self) -> String {
        if let Some(name) = self.project.as_deref().filter(|p| !p.is_empty()) {
            return name.to_string();
        }
        self.project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "default".to_string())
    }

    /// Command for an agent type, falling back to the type name itself
    pub fn command_for(&self, agent_type: &str) -> String {
        self.agents
            .get(agent_type)
            .map(|a| a.command.clone())
            .unwrap_or_else(|| agent_type.to_string())
    }

    pub fn worktree_dir(&self) -> PathBuf {
        self.resolve(&self.git.worktree_dir)
    }

    pub fn store_path(&self) -> PathBuf {
        self.resolve(&self.store.path)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
