// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup reconciliation between the store and live sessions.
//!
//! Two sweeps, in order:
//!
//! 1. Store to backend: non-terminated records without a live session are
//!    marked terminated.
//! 2. Backend to store: live sessions under this project's prefix with no
//!    record at all are killed as orphans. Skipped when the backend cannot
//!    list sessions (e.g. no tmux server running).
//!
//! Safe to run any number of times.

use crate::service::AgentService;
use craizy_core::{AgentId, AgentStatus, Clock};

/// What a reconciliation pass changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records marked terminated because their session was gone
    pub terminated: Vec<AgentId>,
    /// Sessions killed because no record claimed them
    pub orphans_killed: Vec<String>,
    /// The backend could not list sessions, so orphans were not checked
    pub listing_skipped: bool,
}

impl<C: Clock> AgentService<C> {
    /// Repair divergence between stored records and live sessions.
    ///
    /// Never fails; individual repair errors are logged and skipped.
    pub async fn reconcile(&self) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        self.sweep_dead_records(&mut report).await;
        self.sweep_orphan_sessions(&mut report).await;

        tracing::info!(
            parent: &self.log,
            terminated = report.terminated.len(),
            orphans_killed = report.orphans_killed.len(),
            listing_skipped = report.listing_skipped,
            "reconciled",
        );
        report
    }

    async fn sweep_dead_records(&self, report: &mut ReconcileReport) {
        for agent in self.store.list() {
            if agent.status.is_terminal() || self.sessions().exists(agent.id.as_str()).await {
                continue;
            }
            let now = self.clock.epoch_ms();
            match self.store.update_status(&agent.id, AgentStatus::Terminated, now) {
                Ok(()) => {
                    tracing::info!(
                        parent: &self.log,
                        agent_id = %agent.id,
                        "session gone, marked terminated",
                    );
                    report.terminated.push(agent.id);
                }
                Err(e) => {
                    tracing::warn!(
                        parent: &self.log,
                        agent_id = %agent.id,
                        error = %e,
                        "failed to mark terminated",
                    );
                }
            }
        }
    }

    async fn sweep_orphan_sessions(&self, report: &mut ReconcileReport) {
        let live = match self.sessions().list().await {
            Ok(live) => live,
            Err(e) => {
                tracing::debug!(
                    parent: &self.log,
                    error = %e,
                    "session listing unavailable, skipping orphan sweep",
                );
                report.listing_skipped = true;
                return;
            }
        };

        for session in live {
            let id = AgentId::new(session.as_str());
            if !id.belongs_to(self.project()) || self.store.exists(&id) {
                continue;
            }
            match self.sessions().kill(&session).await {
                Ok(()) => {
                    tracing::info!(parent: &self.log, %session, "killed orphaned session");
                    report.orphans_killed.push(session);
                }
                Err(e) => {
                    tracing::warn!(
                        parent: &self.log,
                        %session,
                        error = %e,
                        "failed to kill orphaned session",
                    );
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
