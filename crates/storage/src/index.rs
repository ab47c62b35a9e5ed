// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory agent index shared by every store implementation.

use crate::StoreError;
use craizy_core::{Agent, AgentId, AgentStatus};
use indexmap::IndexMap;

#[derive(Debug, Default, Clone)]
pub(crate) struct AgentIndex {
    agents: IndexMap<AgentId, Agent>,
}

impl AgentIndex {
    pub(crate) fn from_agents(agents: Vec<Agent>) -> Self {
        Self { agents: agents.into_iter().map(|a| (a.id.clone(), a)).collect() }
    }

    pub(crate) fn add(&mut self, agent: Agent) -> Result<(), StoreError> {
        if self.agents.contains_key(&agent.id) {
            return Err(StoreError::Duplicate(agent.id));
        }
        self.agents.insert(agent.id.clone(), agent);
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: &AgentId) -> Result<(), StoreError> {
        // shift_remove keeps the remaining records in insertion order
        match self.agents.shift_remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    pub(crate) fn get(&self, id: &AgentId) -> Option<Agent> {
        self.agents.get(id).cloned()
    }

    pub(crate) fn list(&self) -> Vec<Agent> {
        self.agents.values().cloned().collect()
    }

    pub(crate) fn exists(&self, id: &AgentId) -> bool {
        self.agents.contains_key(id)
    }

    pub(crate) fn update_status(
        &mut self,
        id: &AgentId,
        status: AgentStatus,
        at_ms: u64,
    ) -> Result<(), StoreError> {
        let agent = self.agents.get_mut(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        agent.set_status(status, at_ms);
        Ok(())
    }
}
