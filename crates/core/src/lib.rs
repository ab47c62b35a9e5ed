// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! craizy-core: agent model, identifiers, events and configuration

pub mod agent;
pub mod clock;
pub mod config;
pub mod event;
pub mod id;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::{Agent, AgentStatus};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    AgentTypeConfig, Config, ConfigError, GitConfig, StoreConfig, CONFIG_ENV, STATE_DIR,
};
pub use event::{Event, EventKind};
pub use id::{build_id, project_prefix, sanitize, AgentId, ID_PREFIX};
