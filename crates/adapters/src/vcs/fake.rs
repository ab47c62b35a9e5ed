// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory version-control adapter for tests.

use super::{VcsAdapter, VcsError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded version-control call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Init { path: PathBuf },
    Exclude { path: PathBuf, pattern: String },
    CreateWorktree { path: PathBuf, branch: String, base_branch: String },
    RemoveWorktree { path: PathBuf },
    DeleteBranch { name: String },
    DiscardChanges { path: PathBuf },
    Stash { path: PathBuf },
    StashPop { path: PathBuf },
    Merge { branch: String },
    MergeAbort,
}

struct FakeVcsState {
    repos: HashSet<PathBuf>,
    excludes: BTreeMap<PathBuf, Vec<String>>,
    current_branch: String,
    branches: BTreeSet<String>,
    /// worktree path -> checked-out branch
    worktrees: BTreeMap<PathBuf, String>,
    dirty: HashSet<PathBuf>,
    stashes: HashMap<PathBuf, usize>,
    merged: Vec<String>,
    merge_conflict: bool,
    fail_create_worktree: bool,
    fail_remove_worktree: bool,
    fail_delete_branch: bool,
    calls: Vec<VcsCall>,
}

/// Fake version-control adapter for testing.
///
/// Starts with a `main` branch checked out and every path treated as a
/// repository until [`FakeVcsAdapter::set_not_repo`] says otherwise.
#[derive(Clone)]
pub struct FakeVcsAdapter {
    inner: Arc<Mutex<FakeVcsState>>,
    all_paths_are_repos: Arc<Mutex<bool>>,
}

impl Default for FakeVcsAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeVcsState {
                repos: HashSet::new(),
                excludes: BTreeMap::new(),
                current_branch: "main".to_string(),
                branches: BTreeSet::from(["main".to_string()]),
                worktrees: BTreeMap::new(),
                dirty: HashSet::new(),
                stashes: HashMap::new(),
                merged: Vec::new(),
                merge_conflict: false,
                fail_create_worktree: false,
                fail_remove_worktree: false,
                fail_delete_branch: false,
                calls: Vec::new(),
            })),
            all_paths_are_repos: Arc::new(Mutex::new(true)),
        }
    }
}

fn failed(op: &'static str, target: impl Into<String>) -> VcsError {
    VcsError::CommandFailed { op, target: target.into(), reason: "injected failure".to_string() }
}

impl FakeVcsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only paths passed to `init` count as repositories from now on.
    pub fn set_not_repo(&self) {
        *self.all_paths_are_repos.lock() = false;
    }

    pub fn add_branch(&self, name: &str) {
        self.inner.lock().branches.insert(name.to_string());
    }

    pub fn set_current_branch(&self, name: &str) {
        let mut inner = self.inner.lock();
        inner.branches.insert(name.to_string());
        inner.current_branch = name.to_string();
    }

    pub fn set_dirty(&self, path: &Path, dirty: bool) {
        let mut inner = self.inner.lock();
        if dirty {
            inner.dirty.insert(path.to_path_buf());
        } else {
            inner.dirty.remove(path);
        }
    }

    pub fn set_merge_conflict(&self, conflict: bool) {
        self.inner.lock().merge_conflict = conflict;
    }

    pub fn fail_create_worktree(&self, fail: bool) {
        self.inner.lock().fail_create_worktree = fail;
    }

    pub fn fail_remove_worktree(&self, fail: bool) {
        self.inner.lock().fail_remove_worktree = fail;
    }

    pub fn fail_delete_branch(&self, fail: bool) {
        self.inner.lock().fail_delete_branch = fail;
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.inner.lock().branches.contains(name)
    }

    pub fn has_worktree(&self, path: &Path) -> bool {
        self.inner.lock().worktrees.contains_key(path)
    }

    pub fn is_dirty(&self, path: &Path) -> bool {
        self.inner.lock().dirty.contains(path)
    }

    pub fn stash_depth(&self, path: &Path) -> usize {
        self.inner.lock().stashes.get(path).copied().unwrap_or(0)
    }

    /// Patterns excluded for the repository at `path`
    pub fn excluded(&self, path: &Path) -> Vec<String> {
        self.inner.lock().excludes.get(path).cloned().unwrap_or_default()
    }

    /// Branches merged successfully, in order
    pub fn merged(&self) -> Vec<String> {
        self.inner.lock().merged.clone()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<VcsCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl VcsAdapter for FakeVcsAdapter {
    async fn is_repo(&self, path: &Path) -> bool {
        *self.all_paths_are_repos.lock() || self.inner.lock().repos.contains(path)
    }

    async fn init(&self, path: &Path) -> Result<(), VcsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(VcsCall::Init { path: path.to_path_buf() });
        inner.repos.insert(path.to_path_buf());
        Ok(())
    }

    async fn exclude(&self, path: &Path, pattern: &str) -> Result<(), VcsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(VcsCall::Exclude { path: path.to_path_buf(), pattern: pattern.to_string() });
        let patterns = inner.excludes.entry(path.to_path_buf()).or_default();
        if !patterns.iter().any(|p| p == pattern) {
            patterns.push(pattern.to_string());
        }
        Ok(())
    }

    async fn current_branch(&self, path: &Path) -> Result<String, VcsError> {
        let inner = self.inner.lock();
        Ok(inner.worktrees.get(path).cloned().unwrap_or_else(|| inner.current_branch.clone()))
    }

    async fn branch_exists(&self, name: &str) -> bool {
        self.inner.lock().branches.contains(name)
    }

    async fn create_worktree(
        &self,
        path: &Path,
        branch: &str,
        base_branch: &str,
    ) -> Result<(), VcsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(VcsCall::CreateWorktree {
            path: path.to_path_buf(),
            branch: branch.to_string(),
            base_branch: base_branch.to_string(),
        });
        if inner.fail_create_worktree {
            return Err(failed("git worktree add", path.display().to_string()));
        }
        if inner.worktrees.contains_key(path) {
            return Err(VcsError::CommandFailed {
                op: "git worktree add",
                target: path.display().to_string(),
                reason: "already exists".to_string(),
            });
        }
        inner.branches.insert(branch.to_string());
        inner.worktrees.insert(path.to_path_buf(), branch.to_string());
        Ok(())
    }

    async fn remove_worktree(&self, path: &Path) -> Result<(), VcsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(VcsCall::RemoveWorktree { path: path.to_path_buf() });
        if inner.fail_remove_worktree {
            return Err(failed("git worktree remove", path.display().to_string()));
        }
        inner.worktrees.remove(path);
        inner.dirty.remove(path);
        Ok(())
    }

    async fn delete_branch(&self, name: &str) -> Result<(), VcsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(VcsCall::DeleteBranch { name: name.to_string() });
        if inner.fail_delete_branch {
            return Err(failed("git branch -D", name));
        }
        if !inner.branches.remove(name) {
            return Err(VcsError::CommandFailed {
                op: "git branch -D",
                target: name.to_string(),
                reason: "branch not found".to_string(),
            });
        }
        Ok(())
    }

    async fn has_uncommitted_changes(&self, path: &Path) -> bool {
        self.inner.lock().dirty.contains(path)
    }

    async fn discard_changes(&self, path: &Path) -> Result<(), VcsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(VcsCall::DiscardChanges { path: path.to_path_buf() });
        inner.dirty.remove(path);
        Ok(())
    }

    async fn stash(&self, path: &Path) -> Result<(), VcsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(VcsCall::Stash { path: path.to_path_buf() });
        inner.dirty.remove(path);
        *inner.stashes.entry(path.to_path_buf()).or_default() += 1;
        Ok(())
    }

    async fn stash_pop(&self, path: &Path) -> Result<(), VcsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(VcsCall::StashPop { path: path.to_path_buf() });
        match inner.stashes.get_mut(path) {
            Some(depth) if *depth > 0 => {
                *depth -= 1;
                inner.dirty.insert(path.to_path_buf());
                Ok(())
            }
            _ => Err(VcsError::CommandFailed {
                op: "git stash pop",
                target: path.display().to_string(),
                reason: "no stash entries".to_string(),
            }),
        }
    }

    async fn merge(&self, branch: &str) -> Result<(), VcsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(VcsCall::Merge { branch: branch.to_string() });
        if inner.merge_conflict {
            return Err(VcsError::MergeConflict {
                branch: branch.to_string(),
                reason: "CONFLICT (content)".to_string(),
            });
        }
        inner.merged.push(branch.to_string());
        Ok(())
    }

    async fn merge_abort(&self) -> Result<(), VcsError> {
        self.inner.lock().calls.push(VcsCall::MergeAbort);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
