// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public agent operations.

use crate::dispatch::Dispatcher;
use crate::handlers::{CreateAgentHandler, KillAgentHandler};
use craizy_adapters::{AttachHandle, SessionAdapter, SessionError, VcsAdapter, VcsError};
use craizy_core::{build_id, Agent, AgentId, Clock, Config, Event, EventKind, STATE_DIR};
use craizy_storage::{AgentStore, StoreError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::Span;

/// Errors returned synchronously by [`AgentService`] operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("session already exists: {0}")]
    DuplicateSession(AgentId),
    #[error("branch {0} already exists; merge or delete it before reusing the name")]
    BranchConflict(String),
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),
    #[error("agent {0} has no branch")]
    NoBranch(AgentId),
    #[error("version control is not enabled for this project")]
    VcsDisabled,
    #[error("{op} failed for {target}: {source}")]
    Vcs {
        op: &'static str,
        target: String,
        #[source]
        source: VcsError,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of merging an agent's branch back.
#[derive(Debug, Default)]
pub struct MergeResult {
    pub success: bool,
    /// Main working directory changes were stashed around the merge
    pub stashed: bool,
    pub conflict_err: Option<VcsError>,
}

/// Adapters the service is built from.
///
/// `vcs` is `None` when version control is disabled for the project.
pub struct ServiceDeps {
    pub sessions: Arc<dyn SessionAdapter>,
    pub vcs: Option<Arc<dyn VcsAdapter>>,
    pub store: Arc<dyn AgentStore>,
}

/// Where the project lives and what it is called.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub project: String,
    pub project_dir: PathBuf,
    pub worktree_dir: PathBuf,
    /// Files and directories the tool itself writes; kept out of version
    /// control when they live inside the project directory
    pub state_paths: Vec<PathBuf>,
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            project: config.project_name(),
            project_dir: config.project_dir.clone(),
            worktree_dir: config.worktree_dir(),
            state_paths: vec![
                config.project_dir.join(STATE_DIR),
                config.worktree_dir(),
                config.store_path(),
            ],
        }
    }
}

/// Root-anchored ignore patterns for the state paths under `project_dir`.
///
/// Paths outside the project, and paths already covered by an earlier
/// entry, produce no pattern.
fn exclude_patterns(project_dir: &Path, state_paths: &[PathBuf]) -> Vec<String> {
    let mut covered: Vec<&Path> = Vec::new();
    let mut patterns = Vec::new();
    for path in state_paths {
        let Ok(rel) = path.strip_prefix(project_dir) else {
            continue;
        };
        if rel.as_os_str().is_empty() || covered.iter().any(|c| path.starts_with(c)) {
            continue;
        }
        covered.push(path);
        let parts: Vec<String> =
            rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
        patterns.push(format!("/{}", parts.join("/")));
    }
    patterns
}

/// Orchestrates agent creation, teardown, merges and queries.
///
/// Create and kill only validate and publish; the handlers wired at
/// construction do the session and store work.
pub struct AgentService<C: Clock> {
    settings: ServiceSettings,
    sessions: Arc<dyn SessionAdapter>,
    vcs: Option<Arc<dyn VcsAdapter>>,
    pub(crate) store: Arc<dyn AgentStore>,
    dispatcher: Arc<Dispatcher>,
    pub(crate) clock: C,
    pub(crate) log: Span,
}

impl<C: Clock> AgentService<C> {
    pub fn new(settings: ServiceSettings, deps: ServiceDeps, clock: C, log: Span) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(log.clone()));
        dispatcher.subscribe(
            EventKind::AgentCreated,
            Arc::new(CreateAgentHandler::new(
                Arc::clone(&deps.sessions),
                deps.vcs.clone(),
                Arc::clone(&deps.store),
                log.clone(),
            )),
        );
        dispatcher.subscribe(
            EventKind::AgentKilled,
            Arc::new(KillAgentHandler::new(
                Arc::clone(&deps.sessions),
                deps.vcs.clone(),
                Arc::clone(&deps.store),
                log.clone(),
            )),
        );
        Self {
            settings,
            sessions: deps.sessions,
            vcs: deps.vcs,
            store: deps.store,
            dispatcher,
            clock,
            log,
        }
    }

    pub fn project(&self) -> &str {
        &self.settings.project
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub(crate) fn sessions(&self) -> &dyn SessionAdapter {
        self.sessions.as_ref()
    }

    /// Initialise a repository in the project directory if version control
    /// is on and there is none yet, and keep the tool's own state out of it.
    pub async fn prepare(&self) -> Result<(), ServiceError> {
        let Some(vcs) = &self.vcs else {
            return Ok(());
        };
        let dir = &self.settings.project_dir;
        if !vcs.is_repo(dir).await {
            vcs.init(dir).await.map_err(|source| ServiceError::Vcs {
                op: "init repository",
                target: dir.display().to_string(),
                source,
            })?;
            tracing::info!(parent: &self.log, dir = %dir.display(), "initialized repository");
        }
        for pattern in exclude_patterns(dir, &self.settings.state_paths) {
            vcs.exclude(dir, &pattern).await.map_err(|source| ServiceError::Vcs {
                op: "exclude state path",
                target: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Create an agent and publish it for the handlers to start.
    ///
    /// The returned record is the intended state. Session or store failures
    /// inside the handlers are logged, not returned; reconciliation repairs
    /// whatever they leave behind.
    pub async fn create(
        &self,
        agent_type: &str,
        name: &str,
        command: &str,
    ) -> Result<Agent, ServiceError> {
        let id = build_id(&self.settings.project, agent_type, name);

        if let Some(existing) = self.store.get(&id) {
            if existing.is_active() {
                return Err(ServiceError::DuplicateSession(id));
            }
            // Ids are reused once the previous agent is gone
            self.store.remove(&id)?;
            tracing::debug!(parent: &self.log, agent_id = %id, "removed previous record");
        }

        let (work_dir, base_branch) = match &self.vcs {
            Some(vcs) => {
                let (path, base) = self.create_worktree(vcs.as_ref(), &id).await?;
                (path, Some(base))
            }
            None => (self.settings.project_dir.clone(), None),
        };

        let now = self.clock.epoch_ms();
        let mut agent = Agent::new(
            id,
            self.settings.project.clone(),
            agent_type,
            name,
            command,
            work_dir,
            now,
        );
        if let Some(base) = base_branch {
            agent = agent.with_branch(base);
        }

        let event = Event::AgentCreated { agent: agent.clone(), timestamp_ms: now };
        self.dispatcher.publish(&event).await;
        Ok(agent)
    }

    async fn create_worktree(
        &self,
        vcs: &dyn VcsAdapter,
        id: &AgentId,
    ) -> Result<(PathBuf, String), ServiceError> {
        if vcs.branch_exists(id.as_str()).await {
            return Err(ServiceError::BranchConflict(id.to_string()));
        }
        let project_dir = &self.settings.project_dir;
        let base = vcs.current_branch(project_dir).await.map_err(|source| ServiceError::Vcs {
            op: "read current branch",
            target: project_dir.display().to_string(),
            source,
        })?;
        let path = self.settings.worktree_dir.join(id.as_str());
        vcs.create_worktree(&path, id.as_str(), &base).await.map_err(|source| {
            ServiceError::Vcs { op: "create worktree", target: path.display().to_string(), source }
        })?;
        Ok((path, base))
    }

    /// Publish a kill for `id`. Teardown failures are only logged.
    pub async fn kill(&self, id: &AgentId) {
        let event = Event::AgentKilled { agent_id: id.clone(), timestamp_ms: self.clock.epoch_ms() };
        self.dispatcher.publish(&event).await;
    }

    /// Whether killing `id` would lose uncommitted work in its worktree.
    pub async fn check_kill(&self, id: &AgentId) -> Result<bool, ServiceError> {
        let Some(vcs) = &self.vcs else {
            return Ok(false);
        };
        let agent = self.store.get(id).ok_or_else(|| ServiceError::AgentNotFound(id.clone()))?;
        if agent.branch.is_none() {
            return Ok(false);
        }
        Ok(vcs.has_uncommitted_changes(&agent.work_dir).await)
    }

    /// Kill `id`, first stashing (or, with `discard_changes`, dropping) any
    /// uncommitted work in its worktree.
    pub async fn force_kill(&self, id: &AgentId, discard_changes: bool) {
        if let (Some(vcs), Some(agent)) = (&self.vcs, self.store.get(id)) {
            if agent.branch.is_some() && vcs.has_uncommitted_changes(&agent.work_dir).await {
                let result = if discard_changes {
                    vcs.discard_changes(&agent.work_dir).await
                } else {
                    vcs.stash(&agent.work_dir).await
                };
                match result {
                    Ok(()) => tracing::info!(
                        parent: &self.log,
                        agent_id = %id,
                        discarded = discard_changes,
                        "set aside uncommitted changes",
                    ),
                    Err(e) => tracing::warn!(
                        parent: &self.log,
                        agent_id = %id,
                        error = %e,
                        "failed to set aside uncommitted changes",
                    ),
                }
            }
        }
        self.kill(id).await;
    }

    /// Merge the agent's branch into the branch checked out in the project
    /// directory, stashing local changes around the merge.
    ///
    /// A conflicted merge is left in place for the user to resolve (or back
    /// out with [`abort_merge`](Self::abort_merge)); the stash is popped
    /// either way.
    pub async fn merge_agent(&self, id: &AgentId) -> Result<MergeResult, ServiceError> {
        let vcs = self.vcs.as_ref().ok_or(ServiceError::VcsDisabled)?;
        let agent = self.store.get(id).ok_or_else(|| ServiceError::AgentNotFound(id.clone()))?;
        let branch = agent.branch.ok_or_else(|| ServiceError::NoBranch(id.clone()))?;
        let project_dir = &self.settings.project_dir;

        let mut result = MergeResult::default();
        if vcs.has_uncommitted_changes(project_dir).await {
            vcs.stash(project_dir).await.map_err(|source| ServiceError::Vcs {
                op: "stash",
                target: project_dir.display().to_string(),
                source,
            })?;
            result.stashed = true;
        }

        match vcs.merge(&branch).await {
            Ok(()) => {
                result.success = true;
                tracing::info!(parent: &self.log, %branch, "merged agent branch");
            }
            Err(e) => {
                tracing::warn!(parent: &self.log, %branch, error = %e, "merge failed");
                result.conflict_err = Some(e);
            }
        }

        if result.stashed {
            if let Err(e) = vcs.stash_pop(project_dir).await {
                tracing::warn!(parent: &self.log, error = %e, "failed to restore stashed changes");
            }
        }
        Ok(result)
    }

    /// Back out of an in-progress merge in the project directory.
    pub async fn abort_merge(&self) -> Result<(), ServiceError> {
        let vcs = self.vcs.as_ref().ok_or(ServiceError::VcsDisabled)?;
        vcs.merge_abort().await.map_err(|source| ServiceError::Vcs {
            op: "abort merge",
            target: self.settings.project_dir.display().to_string(),
            source,
        })
    }

    /// Active agents of this project.
    pub fn list(&self) -> Vec<Agent> {
        self.store
            .list()
            .into_iter()
            .filter(|a| a.is_active() && a.project == self.settings.project)
            .collect()
    }

    pub fn exists(&self, id: &AgentId) -> bool {
        self.store.exists(id)
    }

    pub fn get(&self, id: &AgentId) -> Option<Agent> {
        self.store.get(id)
    }

    /// Hand the terminal to the agent's session; resolves on detach.
    pub fn attach(&self, id: &AgentId) -> AttachHandle {
        self.sessions.attach(id.as_str())
    }

    /// Last `lines` lines of the agent's session output.
    pub async fn capture_output(&self, id: &AgentId, lines: u32) -> Result<String, ServiceError> {
        Ok(self.sessions.capture_pane(id.as_str(), lines).await?)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
