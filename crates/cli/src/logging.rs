// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File logging for the binary.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `CRAIZY_LOG=craizy_engine=debug`
pub const LOG_ENV: &str = "CRAIZY_LOG";

pub const LOG_FILE: &str = "craizy.log";

/// Send `tracing` output to `<state_dir>/craizy.log`.
///
/// Keep the guard alive until exit or buffered lines are lost.
pub fn init(state_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(state_dir)
        .with_context(|| format!("cannot create {}", state_dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(state_dir, LOG_FILE));
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;
    Ok(guard)
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}
