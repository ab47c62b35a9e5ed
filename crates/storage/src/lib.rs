// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Persistence for agent records.
//!
//! The store is the source of truth for agents once they are persisted.
//! Every implementation does its own locking so the service, the side-effect
//! handlers and reconciliation can share one instance.

mod index;
mod memory;
mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::{JsonStore, Snapshot, CURRENT_SNAPSHOT_VERSION};

use craizy_core::{Agent, AgentId, AgentStatus};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("agent already exists: {0}")]
    Duplicate(AgentId),
    #[error("agent not found: {0}")]
    NotFound(AgentId),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt store {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent collection of agent records keyed by ID.
pub trait AgentStore: Send + Sync {
    /// Insert a new record; fails if the ID is already present.
    fn add(&self, agent: Agent) -> Result<(), StoreError>;

    fn remove(&self, id: &AgentId) -> Result<(), StoreError>;

    fn get(&self, id: &AgentId) -> Option<Agent>;

    /// All records in insertion order.
    fn list(&self) -> Vec<Agent>;

    fn exists(&self, id: &AgentId) -> bool;

    /// Set the status, setting or clearing `terminated_at_ms` to match.
    fn update_status(&self, id: &AgentId, status: AgentStatus, at_ms: u64)
        -> Result<(), StoreError>;
}
