// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the external tools an agent is built from: the terminal
//! multiplexer hosting its session and the version-control system holding
//! its worktree.
//!
//! Only the traits are meant to be depended on. The tmux and git
//! implementations shell out; the fakes (feature `test-support`) keep
//! everything in memory.

pub mod session;
pub mod subprocess;
pub mod vcs;

pub use session::{AttachHandle, AttachOutcome, SessionAdapter, SessionError, TmuxSessionAdapter};
pub use vcs::{GitAdapter, VcsAdapter, VcsError};

#[cfg(any(test, feature = "test-support"))]
pub use session::{FakeSessionAdapter, SessionCall};
#[cfg(any(test, feature = "test-support"))]
pub use vcs::{FakeVcsAdapter, VcsCall};
