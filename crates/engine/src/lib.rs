// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Agent lifecycle engine.
//!
//! [`AgentService`] validates requests and publishes [`Event`]s; the
//! handlers subscribed on its [`Dispatcher`] perform the session and store
//! side effects, undoing partial work through a [`Saga`] when a step fails.
//! [`AgentService::reconcile`] repairs whatever divergence is left behind.
//!
//! [`Event`]: craizy_core::Event

mod dispatch;
mod handlers;
mod reconcile;
mod saga;
mod service;

pub use dispatch::{Dispatcher, EventHandler, HandlerError};
pub use handlers::{CreateAgentHandler, KillAgentHandler};
pub use reconcile::ReconcileReport;
pub use saga::Saga;
pub use service::{AgentService, MergeResult, ServiceDeps, ServiceError, ServiceSettings};

#[cfg(test)]
mod test_helpers;
