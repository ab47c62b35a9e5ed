// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors that map to a specific process exit code.
//!
//! Commands return these instead of exiting so `main` owns termination.

use std::fmt;

/// Exit code when a command refuses to proceed (dirty worktree, conflict)
pub const BLOCKED: i32 = 2;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn blocked(message: impl Into<String>) -> Self {
        Self { code: BLOCKED, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}
