// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session backend: named, persistent interactive terminal sessions.

mod tmux;

pub use tmux::TmuxSessionAdapter;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("{op} failed for session {id}: {reason}")]
    CommandFailed { op: &'static str, id: String, reason: String },
    /// The backend itself is not reachable (e.g. no tmux server running)
    #[error("session backend unavailable: {0}")]
    Unavailable(String),
}

/// Result of an interactive attach, delivered once the user detaches.
#[derive(Debug)]
pub struct AttachOutcome {
    pub session_id: String,
    pub error: Option<SessionError>,
}

/// One-shot completion of an attach.
pub type AttachHandle = oneshot::Receiver<AttachOutcome>;

/// Adapter for the multiplexer hosting agent sessions
#[async_trait]
pub trait SessionAdapter: Send + Sync + 'static {
    /// Start a detached session named `id` running `command` in `work_dir`.
    async fn create(&self, id: &str, command: &str, work_dir: &Path) -> Result<(), SessionError>;

    /// Kill a session. Killing an absent session is not an error.
    async fn kill(&self, id: &str) -> Result<(), SessionError>;

    /// Names of every live session.
    ///
    /// Returns `Unavailable` when the backend cannot be reached at all.
    async fn list(&self) -> Result<Vec<String>, SessionError>;

    async fn exists(&self, id: &str) -> bool;

    /// Last `lines` lines of the session's visible output.
    async fn capture_pane(&self, id: &str, lines: u32) -> Result<String, SessionError>;

    /// Hand the terminal to the session until the user detaches.
    ///
    /// Returns immediately; the handle resolves once control comes back.
    fn attach(&self, id: &str) -> AttachHandle;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSessionAdapter, SessionCall};
