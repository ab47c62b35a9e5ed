// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent record and status model.
//!
//! An agent pairs one multiplexer session with one working directory (a git
//! worktree on a branch named after the agent when version control is on).
//! Once persisted, the store owns the record; values handed out by queries
//! are copies.

use crate::id::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Lifecycle status of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Reserved; agents are created directly `Active`.
    Pending,
    Active,
    Terminated,
}

impl AgentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Terminated => "terminated",
        })
    }
}

/// A managed agent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub project: String,
    pub agent_type: String,
    pub name: String,
    pub command: String,
    /// Worktree path when version control is on, else the project directory
    pub work_dir: PathBuf,
    pub status: AgentStatus,
    /// Epoch milliseconds when the record was constructed
    pub created_at_ms: u64,
    /// Set exactly when `status` is `Terminated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminated_at_ms: Option<u64>,
    /// Always equal to `id` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Branch checked out in the project directory at creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
}

impl Agent {
    /// Construct a new `Active` agent without version control.
    pub fn new(
        id: AgentId,
        project: impl Into<String>,
        agent_type: impl Into<String>,
        name: impl Into<String>,
        command: impl Into<String>,
        work_dir: impl Into<PathBuf>,
        created_at_ms: u64,
    ) -> Self {
        Self {
            id,
            project: project.into(),
            agent_type: agent_type.into(),
            name: name.into(),
            command: command.into(),
            work_dir: work_dir.into(),
            status: AgentStatus::Active,
            created_at_ms,
            terminated_at_ms: None,
            branch: None,
            base_branch: None,
        }
    }

    /// Attach the agent to its own branch, forked from `base_branch`.
    ///
    /// The branch name is always the agent ID.
    pub fn with_branch(mut self, base_branch: impl Into<String>) -> Self {
        self.branch = Some(self.id.to_string());
        self.base_branch = Some(base_branch.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }

    /// Move to `status`, keeping `terminated_at_ms` in step with it.
    pub fn set_status(&mut self, status: AgentStatus, at_ms: u64) {
        self.status = status;
        self.terminated_at_ms = match status {
            AgentStatus::Terminated => Some(at_ms),
            AgentStatus::Pending | AgentStatus::Active => None,
        };
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
