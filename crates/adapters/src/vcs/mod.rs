// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version-control backend: branches, worktrees, stashes and merges.

mod git;

pub use git::GitAdapter;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from version-control operations
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("{op} failed for {target}: {reason}")]
    CommandFailed { op: &'static str, target: String, reason: String },
    #[error("merge of {branch} conflicted: {reason}")]
    MergeConflict { branch: String, reason: String },
}

/// Adapter for the repository the agents branch from.
///
/// Path-taking methods act on that working directory (the main checkout or
/// an agent worktree); branch and merge operations act on the repository
/// root the adapter was built for.
#[async_trait]
pub trait VcsAdapter: Send + Sync + 'static {
    async fn is_repo(&self, path: &Path) -> bool;

    async fn init(&self, path: &Path) -> Result<(), VcsError>;

    /// Keep `pattern` out of status and stashes for the repository at
    /// `path` without touching tracked files. Idempotent.
    async fn exclude(&self, path: &Path, pattern: &str) -> Result<(), VcsError>;

    /// Branch checked out in `path`.
    async fn current_branch(&self, path: &Path) -> Result<String, VcsError>;

    async fn branch_exists(&self, name: &str) -> bool;

    /// Check out `branch` at `path`, creating it from `base_branch` when it
    /// does not exist yet.
    async fn create_worktree(
        &self,
        path: &Path,
        branch: &str,
        base_branch: &str,
    ) -> Result<(), VcsError>;

    async fn remove_worktree(&self, path: &Path) -> Result<(), VcsError>;

    async fn delete_branch(&self, name: &str) -> Result<(), VcsError>;

    async fn has_uncommitted_changes(&self, path: &Path) -> bool;

    /// Throw away tracked modifications and untracked files.
    async fn discard_changes(&self, path: &Path) -> Result<(), VcsError>;

    async fn stash(&self, path: &Path) -> Result<(), VcsError>;

    async fn stash_pop(&self, path: &Path) -> Result<(), VcsError>;

    /// Merge `branch` into the branch checked out at the repository root.
    async fn merge(&self, branch: &str) -> Result<(), VcsError>;

    async fn merge_abort(&self) -> Result<(), VcsError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeVcsAdapter, VcsCall};
