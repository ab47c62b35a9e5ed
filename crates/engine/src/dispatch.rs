// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process event dispatch.

use async_trait::async_trait;
use craizy_adapters::SessionError;
use craizy_core::{Event, EventKind};
use craizy_storage::StoreError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::Span;

/// Errors a handler reports back to the dispatcher
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Reacts to published events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &Event) -> Result<(), HandlerError>;
}

/// Publish/subscribe bus keyed by [`EventKind`].
///
/// Delivery is sequential: every handler for a kind runs to completion, in
/// subscription order, before `publish` returns. Handler errors are logged
/// here and never reach the publisher.
pub struct Dispatcher {
    handlers: RwLock<HashMap<EventKind, Vec<Arc<dyn EventHandler>>>>,
    log: Span,
}

impl Dispatcher {
    pub fn new(log: Span) -> Self {
        Self { handlers: RwLock::new(HashMap::new()), log }
    }

    pub fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        tracing::debug!(parent: &self.log, event = %kind, handler = handler.name(), "subscribed");
        self.handlers.write().entry(kind).or_default().push(handler);
    }

    pub async fn publish(&self, event: &Event) {
        // Snapshot so the registry lock is not held while handlers run
        let handlers = self.handlers.read().get(&event.kind()).cloned().unwrap_or_default();
        if handlers.is_empty() {
            tracing::debug!(parent: &self.log, event = event.name(), "no subscribers");
            return;
        }

        tracing::info!(
            parent: &self.log,
            agent_id = %event.agent_id(),
            handlers = handlers.len(),
            "publish {}",
            event.log_summary(),
        );
        for handler in handlers {
            if let Err(e) = handler.handle(event).await {
                tracing::warn!(
                    parent: &self.log,
                    event = event.name(),
                    handler = handler.name(),
                    error = %e,
                    "handler failed",
                );
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.read().get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
