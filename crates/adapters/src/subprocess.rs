// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess helpers shared by the tmux and git adapters.
//!
//! Commands run to completion; there is no timeout or cancellation.

use std::process::Output;
use tokio::process::Command;

/// Run a command and collect its output.
///
/// Only spawn failures are errors here. Callers inspect the exit status.
pub async fn run(mut cmd: Command, label: &str) -> std::io::Result<Output> {
    tracing::trace!(command = label, "running");
    let output = cmd.kill_on_drop(true).output().await;
    match &output {
        Ok(out) if !out.status.success() => {
            tracing::debug!(
                command = label,
                status = ?out.status.code(),
                stderr = %stderr_text(out),
                "command exited non-zero"
            );
        }
        Ok(_) => {}
        Err(e) => tracing::debug!(command = label, error = %e, "command failed to spawn"),
    }
    output
}

/// Trimmed stderr, falling back to stdout when stderr is empty.
///
/// Git reports merge conflicts on stdout.
pub fn stderr_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr
    }
}

pub fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
