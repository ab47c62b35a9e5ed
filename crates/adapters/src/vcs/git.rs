// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! git-backed version-control adapter.

use super::{VcsAdapter, VcsError};
use crate::subprocess::{self, stderr_text, stdout_text};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

/// Drives `git` against one repository root.
#[derive(Clone, Debug)]
pub struct GitAdapter {
    repo_root: PathBuf,
}

impl GitAdapter {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self { repo_root: repo_root.into() }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// `git -C <dir> <args>` with inherited repository overrides cleared.
    fn git(dir: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(dir).args(args).env_remove("GIT_DIR").env_remove("GIT_WORK_TREE");
        cmd
    }

    async fn run(
        &self,
        dir: &Path,
        args: &[&str],
        op: &'static str,
        target: &str,
    ) -> Result<Output, VcsError> {
        let output = subprocess::run(Self::git(dir, args), op).await.map_err(|e| {
            VcsError::CommandFailed { op, target: target.to_string(), reason: e.to_string() }
        })?;
        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                op,
                target: target.to_string(),
                reason: stderr_text(&output),
            });
        }
        Ok(output)
    }

    async fn succeeds(&self, dir: &Path, args: &[&str], op: &str) -> bool {
        subprocess::run(Self::git(dir, args), op).await.map(|o| o.status.success()).unwrap_or(false)
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Arguments for `git worktree add`, reusing an existing branch.
fn worktree_add_args<'a>(
    path: &'a str,
    branch: &'a str,
    base_branch: &'a str,
    branch_exists: bool,
) -> Vec<&'a str> {
    if branch_exists {
        vec!["worktree", "add", path, branch]
    } else {
        vec!["worktree", "add", "-b", branch, path, base_branch]
    }
}

#[async_trait]
impl VcsAdapter for GitAdapter {
    async fn is_repo(&self, path: &Path) -> bool {
        self.succeeds(path, &["rev-parse", "--git-dir"], "git rev-parse").await
    }

    async fn init(&self, path: &Path) -> Result<(), VcsError> {
        tokio::fs::create_dir_all(path).await.map_err(|e| VcsError::CommandFailed {
            op: "git init",
            target: path_arg(path),
            reason: e.to_string(),
        })?;
        self.run(path, &["init"], "git init", &path_arg(path)).await?;
        tracing::info!(path = %path.display(), "initialized git repository");
        Ok(())
    }

    async fn exclude(&self, path: &Path, pattern: &str) -> Result<(), VcsError> {
        let output = self
            .run(path, &["rev-parse", "--git-path", "info/exclude"], "git rev-parse", &path_arg(path))
            .await?;
        let file = path.join(stdout_text(&output));
        let io_err = |e: std::io::Error| VcsError::CommandFailed {
            op: "update info/exclude",
            target: path_arg(&file),
            reason: e.to_string(),
        };

        let mut text = match tokio::fs::read_to_string(&file).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(io_err(e)),
        };
        if text.lines().any(|line| line.trim() == pattern) {
            return Ok(());
        }
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(pattern);
        text.push('\n');
        tokio::fs::write(&file, text).await.map_err(io_err)?;
        tracing::debug!(file = %file.display(), pattern, "excluded path");
        Ok(())
    }

    async fn current_branch(&self, path: &Path) -> Result<String, VcsError> {
        let output = self
            .run(path, &["symbolic-ref", "--short", "HEAD"], "git symbolic-ref", &path_arg(path))
            .await?;
        Ok(stdout_text(&output))
    }

    async fn branch_exists(&self, name: &str) -> bool {
        let reference = format!("refs/heads/{name}");
        self.succeeds(&self.repo_root, &["show-ref", "--verify", "--quiet", &reference], "git show-ref")
            .await
    }

    async fn create_worktree(
        &self,
        path: &Path,
        branch: &str,
        base_branch: &str,
    ) -> Result<(), VcsError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| VcsError::CommandFailed {
                op: "git worktree add",
                target: path_arg(path),
                reason: format!("failed to create worktree parent dir: {e}"),
            })?;
        }
        let exists = self.branch_exists(branch).await;
        let path_str = path_arg(path);
        let args = worktree_add_args(&path_str, branch, base_branch, exists);
        self.run(&self.repo_root, &args, "git worktree add", &path_str).await?;
        tracing::info!(path = %path_str, branch, reused = exists, "created worktree");
        Ok(())
    }

    async fn remove_worktree(&self, path: &Path) -> Result<(), VcsError> {
        let path_str = path_arg(path);
        let result = self
            .run(&self.repo_root, &["worktree", "remove", "--force", &path_str], "git worktree remove", &path_str)
            .await;
        // Leftover directory from a half-registered worktree
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            tokio::fs::remove_dir_all(path).await.map_err(|e| VcsError::CommandFailed {
                op: "remove worktree dir",
                target: path_str.clone(),
                reason: e.to_string(),
            })?;
            let _ = self.run(&self.repo_root, &["worktree", "prune"], "git worktree prune", &path_str).await;
            return Ok(());
        }
        result.map(|_| ())
    }

    async fn delete_branch(&self, name: &str) -> Result<(), VcsError> {
        self.run(&self.repo_root, &["branch", "-D", name], "git branch -D", name).await?;
        Ok(())
    }

    async fn has_uncommitted_changes(&self, path: &Path) -> bool {
        match self.run(path, &["status", "--porcelain"], "git status", &path_arg(path)).await {
            Ok(output) => !stdout_text(&output).is_empty(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read worktree status");
                false
            }
        }
    }

    async fn discard_changes(&self, path: &Path) -> Result<(), VcsError> {
        let target = path_arg(path);
        self.run(path, &["reset", "--hard"], "git reset", &target).await?;
        self.run(path, &["clean", "-fd"], "git clean", &target).await?;
        Ok(())
    }

    async fn stash(&self, path: &Path) -> Result<(), VcsError> {
        self.run(path, &["stash", "push", "--include-untracked"], "git stash", &path_arg(path))
            .await?;
        Ok(())
    }

    async fn stash_pop(&self, path: &Path) -> Result<(), VcsError> {
        self.run(path, &["stash", "pop"], "git stash pop", &path_arg(path)).await?;
        Ok(())
    }

    async fn merge(&self, branch: &str) -> Result<(), VcsError> {
        self.run(&self.repo_root, &["merge", "--no-ff", "--no-edit", branch], "git merge", branch)
            .await
            .map_err(|e| match e {
                VcsError::CommandFailed { reason, .. } => {
                    VcsError::MergeConflict { branch: branch.to_string(), reason }
                }
                other => other,
            })?;
        Ok(())
    }

    async fn merge_abort(&self) -> Result<(), VcsError> {
        let root = path_arg(&self.repo_root);
        self.run(&self.repo_root, &["merge", "--abort"], "git merge --abort", &root).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
