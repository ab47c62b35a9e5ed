// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tmux-backed session adapter.

use super::{AttachHandle, AttachOutcome, SessionAdapter, SessionError};
use crate::subprocess::{self, stderr_text, stdout_text};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tokio::sync::oneshot;

#[derive(Clone, Copy, Debug, Default)]
pub struct TmuxSessionAdapter;

impl TmuxSessionAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// Exact-match target so `foo` never resolves to `foo-bar`.
fn exact(id: &str) -> String {
    format!("={id}")
}

fn tmux(args: &[&str]) -> Command {
    let mut cmd = Command::new("tmux");
    cmd.args(args);
    cmd
}

/// Arguments for attaching, depending on whether we already run inside tmux.
fn attach_args(id: &str, inside_tmux: bool) -> Vec<String> {
    let verb = if inside_tmux { "switch-client" } else { "attach-session" };
    vec![verb.to_string(), "-t".to_string(), exact(id)]
}

/// Arguments for capturing the active pane of exactly session `id`.
fn capture_args(id: &str, lines: u32) -> Vec<String> {
    vec![
        "capture-pane".to_string(),
        "-p".to_string(),
        "-t".to_string(),
        format!("{}:", exact(id)),
        "-S".to_string(),
        format!("-{lines}"),
    ]
}

fn parse_session_list(stdout: &str) -> Vec<String> {
    stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect()
}

/// Keep at most the last `n` lines; `-S` also counts the visible pane.
fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

fn failed(op: &'static str, id: &str, reason: impl Into<String>) -> SessionError {
    SessionError::CommandFailed { op, id: id.to_string(), reason: reason.into() }
}

#[async_trait]
impl SessionAdapter for TmuxSessionAdapter {
    async fn create(&self, id: &str, command: &str, work_dir: &Path) -> Result<(), SessionError> {
        let dir = work_dir.display().to_string();
        let cmd = tmux(&["new-session", "-d", "-s", id, "-c", &dir, command]);
        let output = subprocess::run(cmd, "tmux new-session")
            .await
            .map_err(|e| failed("tmux new-session", id, e.to_string()))?;
        if !output.status.success() {
            return Err(failed("tmux new-session", id, stderr_text(&output)));
        }
        tracing::info!(session = id, workdir = %dir, "created tmux session");
        Ok(())
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        if !self.exists(id).await {
            return Ok(());
        }
        let output = subprocess::run(tmux(&["kill-session", "-t", &exact(id)]), "tmux kill-session")
            .await
            .map_err(|e| failed("tmux kill-session", id, e.to_string()))?;
        // Lost a race with the session exiting on its own
        if !output.status.success() && self.exists(id).await {
            return Err(failed("tmux kill-session", id, stderr_text(&output)));
        }
        tracing::info!(session = id, "killed tmux session");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, SessionError> {
        let output =
            subprocess::run(tmux(&["list-sessions", "-F", "#{session_name}"]), "tmux list-sessions")
                .await
                .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        if !output.status.success() {
            return Err(SessionError::Unavailable(stderr_text(&output)));
        }
        Ok(parse_session_list(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn exists(&self, id: &str) -> bool {
        subprocess::run(tmux(&["has-session", "-t", &exact(id)]), "tmux has-session")
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn capture_pane(&self, id: &str, lines: u32) -> Result<String, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(capture_args(id, lines));
        let output = subprocess::run(cmd, "tmux capture-pane")
            .await
            .map_err(|e| failed("tmux capture-pane", id, e.to_string()))?;
        if !output.status.success() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        Ok(tail_lines(&stdout_text(&output), lines as usize))
    }

    fn attach(&self, id: &str) -> AttachHandle {
        let (tx, rx) = oneshot::channel();
        let session_id = id.to_string();
        let args = attach_args(id, std::env::var_os("TMUX").is_some());
        tokio::task::spawn_blocking(move || {
            let error = match std::process::Command::new("tmux").args(&args).status() {
                Ok(status) if status.success() => None,
                Ok(status) => Some(failed(
                    "tmux attach",
                    &session_id,
                    format!("exited with {}", status.code().unwrap_or(-1)),
                )),
                Err(e) => Some(failed("tmux attach", &session_id, e.to_string())),
            };
            // Receiver dropped means nobody is waiting; nothing to report
            let _ = tx.send(AttachOutcome { session_id, error });
        });
        rx
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
