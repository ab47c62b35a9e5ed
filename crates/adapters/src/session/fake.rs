// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory session adapter for tests.

use super::{AttachHandle, AttachOutcome, SessionAdapter, SessionError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Recorded session call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Create { id: String, command: String, work_dir: PathBuf },
    Kill { id: String },
    List,
    Exists { id: String },
    CapturePane { id: String, lines: u32 },
    Attach { id: String },
}

#[derive(Debug, Clone)]
struct FakeSession {
    command: String,
    work_dir: PathBuf,
    output: String,
}

#[derive(Default)]
struct FakeSessionState {
    sessions: BTreeMap<String, FakeSession>,
    calls: Vec<SessionCall>,
    fail_create: bool,
    fail_kill: HashSet<String>,
    list_unavailable: bool,
}

/// Fake session adapter for testing
#[derive(Clone, Default)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live session that this adapter did not create.
    pub fn add_session(&self, id: &str) {
        self.inner.lock().sessions.insert(
            id.to_string(),
            FakeSession { command: String::new(), work_dir: PathBuf::new(), output: String::new() },
        );
    }

    /// Drop a session as if it exited on its own.
    pub fn end_session(&self, id: &str) {
        self.inner.lock().sessions.remove(id);
    }

    pub fn set_output(&self, id: &str, output: &str) {
        if let Some(s) = self.inner.lock().sessions.get_mut(id) {
            s.output = output.to_string();
        }
    }

    pub fn fail_create(&self, fail: bool) {
        self.inner.lock().fail_create = fail;
    }

    pub fn fail_kill(&self, id: &str) {
        self.inner.lock().fail_kill.insert(id.to_string());
    }

    pub fn set_list_unavailable(&self, unavailable: bool) {
        self.inner.lock().list_unavailable = unavailable;
    }

    pub fn has_session(&self, id: &str) -> bool {
        self.inner.lock().sessions.contains_key(id)
    }

    pub fn session_names(&self) -> Vec<String> {
        self.inner.lock().sessions.keys().cloned().collect()
    }

    /// Command and directory a session was started with
    pub fn session_launch(&self, id: &str) -> Option<(String, PathBuf)> {
        self.inner.lock().sessions.get(id).map(|s| (s.command.clone(), s.work_dir.clone()))
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded kill targets, in order
    pub fn kills(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SessionCall::Kill { id } => Some(id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn create(&self, id: &str, command: &str, work_dir: &Path) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Create {
            id: id.to_string(),
            command: command.to_string(),
            work_dir: work_dir.to_path_buf(),
        });
        if inner.fail_create {
            return Err(SessionError::CommandFailed {
                op: "create",
                id: id.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        if inner.sessions.contains_key(id) {
            return Err(SessionError::CommandFailed {
                op: "create",
                id: id.to_string(),
                reason: format!("duplicate session: {id}"),
            });
        }
        inner.sessions.insert(
            id.to_string(),
            FakeSession {
                command: command.to_string(),
                work_dir: work_dir.to_path_buf(),
                output: String::new(),
            },
        );
        Ok(())
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Kill { id: id.to_string() });
        if inner.fail_kill.contains(id) {
            return Err(SessionError::CommandFailed {
                op: "kill",
                id: id.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        inner.sessions.remove(id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::List);
        if inner.list_unavailable {
            return Err(SessionError::Unavailable("no server running".to_string()));
        }
        Ok(inner.sessions.keys().cloned().collect())
    }

    async fn exists(&self, id: &str) -> bool {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Exists { id: id.to_string() });
        inner.sessions.contains_key(id)
    }

    async fn capture_pane(&self, id: &str, lines: u32) -> Result<String, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::CapturePane { id: id.to_string(), lines });
        let session =
            inner.sessions.get(id).ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        let all: Vec<&str> = session.output.lines().collect();
        Ok(all[all.len().saturating_sub(lines as usize)..].join("\n"))
    }

    fn attach(&self, id: &str) -> AttachHandle {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Attach { id: id.to_string() });
        let error =
            (!inner.sessions.contains_key(id)).then(|| SessionError::NotFound(id.to_string()));
        let _ = tx.send(AttachOutcome { session_id: id.to_string(), error });
        rx
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
