// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Side-effect handlers wired to the agent lifecycle events.
//!
//! These are the only writers of session state, and the only code that
//! pairs a store mutation with an external side effect.

use crate::dispatch::{EventHandler, HandlerError};
use crate::saga::Saga;
use async_trait::async_trait;
use craizy_adapters::{SessionAdapter, VcsAdapter};
use craizy_core::{Agent, AgentId, AgentStatus, Event};
use craizy_storage::AgentStore;
use std::sync::Arc;
use tracing::Span;

/// Starts the session for a newly constructed agent and persists it.
///
/// Nothing survives a failure: the session, the worktree and the branch
/// are all rolled back.
pub struct CreateAgentHandler {
    sessions: Arc<dyn SessionAdapter>,
    vcs: Option<Arc<dyn VcsAdapter>>,
    store: Arc<dyn AgentStore>,
    log: Span,
}

impl CreateAgentHandler {
    pub fn new(
        sessions: Arc<dyn SessionAdapter>,
        vcs: Option<Arc<dyn VcsAdapter>>,
        store: Arc<dyn AgentStore>,
        log: Span,
    ) -> Self {
        Self { sessions, vcs, store, log }
    }

    async fn create(&self, agent: &Agent) -> Result<(), HandlerError> {
        let mut saga = Saga::new("create agent", self.log.clone());

        // Worktree and branch already exist by the time the event fires
        if let (Some(vcs), Some(branch)) = (&self.vcs, &agent.branch) {
            let (vcs_a, branch) = (Arc::clone(vcs), branch.clone());
            saga.on_undo("delete branch", move || async move { vcs_a.delete_branch(&branch).await });
            let (vcs_b, path) = (Arc::clone(vcs), agent.work_dir.clone());
            saga.on_undo("remove worktree", move || async move {
                vcs_b.remove_worktree(&path).await
            });
        }

        saga.step(
            "create session",
            self.sessions.create(agent.id.as_str(), &agent.command, &agent.work_dir),
        )
        .await?;
        let (sessions, id) = (Arc::clone(&self.sessions), agent.id.to_string());
        saga.on_undo("kill session", move || async move { sessions.kill(&id).await });

        saga.step("persist agent", async { self.store.add(agent.clone()) }).await?;
        saga.commit();

        tracing::info!(
            parent: &self.log,
            agent_id = %agent.id,
            work_dir = %agent.work_dir.display(),
            "agent started",
        );
        Ok(())
    }
}

#[async_trait]
impl EventHandler for CreateAgentHandler {
    fn name(&self) -> &'static str {
        "create-agent"
    }

    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        match event {
            Event::AgentCreated { agent, .. } => self.create(agent).await,
            _ => Ok(()),
        }
    }
}

/// Tears an agent down: session, worktree and branch, then marks the
/// record terminated.
pub struct KillAgentHandler {
    sessions: Arc<dyn SessionAdapter>,
    vcs: Option<Arc<dyn VcsAdapter>>,
    store: Arc<dyn AgentStore>,
    log: Span,
}

impl KillAgentHandler {
    pub fn new(
        sessions: Arc<dyn SessionAdapter>,
        vcs: Option<Arc<dyn VcsAdapter>>,
        store: Arc<dyn AgentStore>,
        log: Span,
    ) -> Self {
        Self { sessions, vcs, store, log }
    }

    async fn kill(&self, agent_id: &AgentId, at_ms: u64) -> Result<(), HandlerError> {
        if let Err(e) = self.sessions.kill(agent_id.as_str()).await {
            tracing::warn!(parent: &self.log, %agent_id, error = %e, "failed to kill session");
        }

        let agent = self.store.get(agent_id);
        if agent.as_ref().is_some_and(|a| a.status.is_terminal()) {
            tracing::debug!(parent: &self.log, %agent_id, "already terminated");
            return Ok(());
        }
        if let (Some(vcs), Some(agent)) = (&self.vcs, &agent) {
            remove_workspace(vcs.as_ref(), agent, &self.log).await;
        }

        self.store.update_status(agent_id, AgentStatus::Terminated, at_ms)?;
        tracing::info!(parent: &self.log, %agent_id, "agent terminated");
        Ok(())
    }
}

#[async_trait]
impl EventHandler for KillAgentHandler {
    fn name(&self) -> &'static str {
        "kill-agent"
    }

    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        match event {
            Event::AgentKilled { agent_id, .. } => self.kill(agent_id, event.timestamp_ms()).await,
            _ => Ok(()),
        }
    }
}

/// Best-effort removal of an agent's worktree and branch.
async fn remove_workspace(vcs: &dyn VcsAdapter, agent: &Agent, log: &Span) {
    let Some(branch) = &agent.branch else {
        return;
    };
    if let Err(e) = vcs.remove_worktree(&agent.work_dir).await {
        tracing::warn!(parent: log, agent_id = %agent.id, error = %e, "failed to remove worktree");
    }
    if let Err(e) = vcs.delete_branch(branch).await {
        tracing::warn!(parent: log, agent_id = %agent.id, error = %e, "failed to delete branch");
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
