// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent identifiers and name sanitization.
//!
//! Agent IDs are deterministic: the same project, agent type and name always
//! produce the same ID, which doubles as the tmux session name and the git
//! branch name.
//!
//! ```text
//! craizy-<project>-<agent type>-<name>
//! ```

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Prefix reserved for every session this tool creates.
pub const ID_PREFIX: &str = "craizy";

/// Normalize a free-form name into an identifier-safe slug.
///
/// Lowercases, drops `.` and `:`, turns spaces into hyphens, drops anything
/// outside `[a-z0-9-]`, collapses hyphen runs and trims hyphens from both
/// ends. Input made only of special characters yields an empty string.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_hyphen = false;
    for ch in name.to_lowercase().chars() {
        let ch = match ch {
            '.' | ':' => continue,
            ' ' => '-',
            c if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' => c,
            _ => continue,
        };
        if ch == '-' {
            if last_was_hyphen {
                continue;
            }
            last_was_hyphen = true;
        } else {
            last_was_hyphen = false;
        }
        out.push(ch);
    }
    out.trim_matches('-').to_string()
}

/// Session-name prefix owned by a project: `craizy-<project>-`.
///
/// Reconciliation only ever touches live sessions starting with this.
pub fn project_prefix(project: &str) -> String {
    format!("{}-{}-", ID_PREFIX, sanitize(project))
}

/// Build the composite agent ID for a project, agent type and name.
pub fn build_id(project: &str, agent_type: &str, name: &str) -> AgentId {
    AgentId::new(format!(
        "{}{}-{}",
        project_prefix(project),
        sanitize(agent_type),
        sanitize(name)
    ))
}

/// Unique key of an agent in the store; also its session and branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(SmolStr);

impl AgentId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this ID lives under the given project's session prefix.
    pub fn belongs_to(&self, project: &str) -> bool {
        self.0.starts_with(&project_prefix(project))
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for AgentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AgentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::borrow::Borrow<str> for AgentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
