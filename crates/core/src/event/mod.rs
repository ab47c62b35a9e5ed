// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle events published by the agent service.
//!
//! Events are a closed sum type. Subscribers register against an
//! [`EventKind`], and [`Event::kind`] is an exhaustive match, so adding a
//! variant forces every dispatch table to be revisited. Events are never
//! persisted.

use crate::agent::{Agent, AgentStatus};
use crate::id::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notifications that drive side effects.
///
/// Serializes with `{"type": "agent:created", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// An agent was constructed and needs a session and a store record.
    #[serde(rename = "agent:created")]
    AgentCreated { agent: Agent, timestamp_ms: u64 },

    /// An agent should be torn down.
    #[serde(rename = "agent:killed")]
    AgentKilled { agent_id: AgentId, timestamp_ms: u64 },

    #[serde(rename = "agent:status_changed")]
    AgentStatusChanged {
        agent_id: AgentId,
        old_status: AgentStatus,
        new_status: AgentStatus,
        timestamp_ms: u64,
    },
}

/// Payload-free tag of an [`Event`], used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AgentCreated,
    AgentKilled,
    AgentStatusChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 3] =
        [EventKind::AgentCreated, EventKind::AgentKilled, EventKind::AgentStatusChanged];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::AgentCreated => "agent:created",
            EventKind::AgentKilled => "agent:killed",
            EventKind::AgentStatusChanged => "agent:status_changed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::AgentCreated { .. } => EventKind::AgentCreated,
            Event::AgentKilled { .. } => EventKind::AgentKilled,
            Event::AgentStatusChanged { .. } => EventKind::AgentStatusChanged,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// ID of the agent the event is about.
    pub fn agent_id(&self) -> &AgentId {
        match self {
            Event::AgentCreated { agent, .. } => &agent.id,
            Event::AgentKilled { agent_id, .. } | Event::AgentStatusChanged { agent_id, .. } => {
                agent_id
            }
        }
    }

    pub fn timestamp_ms(&self) -> u64 {
        match self {
            Event::AgentCreated { timestamp_ms, .. }
            | Event::AgentKilled { timestamp_ms, .. }
            | Event::AgentStatusChanged { timestamp_ms, .. } => *timestamp_ms,
        }
    }

    /// One-line description for log records.
    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            Event::AgentCreated { agent, .. } => {
                format!("{t} id={} workdir={}", agent.id, agent.work_dir.display())
            }
            Event::AgentKilled { agent_id, .. } => format!("{t} id={agent_id}"),
            Event::AgentStatusChanged { agent_id, old_status, new_status, .. } => {
                format!("{t} id={agent_id} {old_status}->{new_status}")
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
