// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed store persisted as a JSON snapshot.
//!
//! Every mutation is applied to a copy of the index, the copy is written to
//! `<path>.tmp` and renamed over `<path>`, and only then does it replace the
//! in-memory index. A failed write leaves both the file and memory untouched.

use crate::index::AgentIndex;
use crate::{AgentStore, StoreError};
use chrono::{DateTime, Utc};
use craizy_core::{Agent, AgentId, AgentStatus};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version
    #[serde(rename = "v")]
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub agents: Vec<Agent>,
}

#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    index: Mutex<AgentIndex>,
}

impl JsonStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let index = match fs::read(&path) {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)
                    .map_err(|source| StoreError::Json { path: path.clone(), source })?;
                tracing::debug!(
                    path = %path.display(),
                    version = snapshot.version,
                    agents = snapshot.agents.len(),
                    "loaded agent store"
                );
                AgentIndex::from_agents(snapshot.agents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AgentIndex::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, index: Mutex::new(index) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a copy of the index, persist it, then publish it.
    fn mutate<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut AgentIndex) -> Result<(), StoreError>,
    {
        let mut index = self.index.lock();
        let mut next = index.clone();
        f(&mut next)?;
        self.write(&next)?;
        *index = next;
        Ok(())
    }

    fn write(&self, index: &AgentIndex) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };
        let snapshot = Snapshot {
            version: CURRENT_SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            agents: index.list(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|source| StoreError::Json { path: self.path.clone(), source })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl AgentStore for JsonStore {
    fn add(&self, agent: Agent) -> Result<(), StoreError> {
        self.mutate(|index| index.add(agent))
    }

    fn remove(&self, id: &AgentId) -> Result<(), StoreError> {
        self.mutate(|index| index.remove(id))
    }

    fn get(&self, id: &AgentId) -> Option<Agent> {
        self.index.lock().get(id)
    }

    fn list(&self) -> Vec<Agent> {
        self.index.lock().list()
    }

    fn exists(&self, id: &AgentId) -> bool {
        self.index.lock().exists(id)
    }

    fn update_status(
        &self,
        id: &AgentId,
        status: AgentStatus,
        at_ms: u64,
    ) -> Result<(), StoreError> {
        self.mutate(|index| index.update_status(id, status, at_ms))
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
