// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::agent::{Agent, AgentStatus};
use crate::event::Event;
use crate::id::{build_id, AgentId};
use std::path::PathBuf;

/// An `Active` agent with an ID built from the given parts.
pub fn agent(project: &str, agent_type: &str, name: &str) -> Agent {
    AgentBuilder::new(project, agent_type, name).build()
}

/// Test builder for [`Agent`] records.
pub struct AgentBuilder {
    project: String,
    agent_type: String,
    name: String,
    command: String,
    work_dir: PathBuf,
    status: AgentStatus,
    created_at_ms: u64,
    terminated_at_ms: u64,
    base_branch: Option<String>,
}

impl AgentBuilder {
    pub fn new(project: &str, agent_type: &str, name: &str) -> Self {
        Self {
            project: project.to_string(),
            agent_type: agent_type.to_string(),
            name: name.to_string(),
            command: "echo hi".to_string(),
            work_dir: PathBuf::from("/tmp/project"),
            status: AgentStatus::Active,
            created_at_ms: 1_000_000,
            terminated_at_ms: 2_000_000,
            base_branch: None,
        }
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    pub fn work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn terminated(mut self) -> Self {
        self.status = AgentStatus::Terminated;
        self
    }

    pub fn branch_from(mut self, base_branch: impl Into<String>) -> Self {
        self.base_branch = Some(base_branch.into());
        self
    }

    pub fn build(self) -> Agent {
        let id = build_id(&self.project, &self.agent_type, &self.name);
        let mut agent = Agent::new(
            id,
            self.project,
            self.agent_type,
            self.name,
            self.command,
            self.work_dir,
            self.created_at_ms,
        );
        if let Some(base) = self.base_branch {
            agent = agent.with_branch(base);
        }
        agent.set_status(self.status, self.terminated_at_ms);
        agent
    }
}

pub fn created_event(agent: Agent) -> Event {
    Event::AgentCreated { agent, timestamp_ms: 1_000_000 }
}

pub fn killed_event(agent_id: impl Into<AgentId>) -> Event {
    Event::AgentKilled { agent_id: agent_id.into(), timestamp_ms: 2_000_000 }
}
