// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local store with no persistence.

use crate::index::AgentIndex;
use crate::{AgentStore, StoreError};
use craizy_core::{Agent, AgentId, AgentStatus};
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    index: RwLock<AgentIndex>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given records.
    pub fn with_agents(agents: Vec<Agent>) -> Self {
        Self { index: RwLock::new(AgentIndex::from_agents(agents)) }
    }
}

impl AgentStore for MemoryStore {
    fn add(&self, agent: Agent) -> Result<(), StoreError> {
        self.index.write().add(agent)
    }

    fn remove(&self, id: &AgentId) -> Result<(), StoreError> {
        self.index.write().remove(id)
    }

    fn get(&self, id: &AgentId) -> Option<Agent> {
        self.index.read().get(id)
    }

    fn list(&self) -> Vec<Agent> {
        self.index.read().list()
    }

    fn exists(&self, id: &AgentId) -> bool {
        self.index.read().exists(id)
    }

    fn update_status(
        &self,
        id: &AgentId,
        status: AgentStatus,
        at_ms: u64,
    ) -> Result<(), StoreError> {
        self.index.write().update_status(id, status, at_ms)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
