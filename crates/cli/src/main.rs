// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `craizy`: launch, track and tear down agent sessions.

mod cli;
mod color;
mod commands;
mod exit_error;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use craizy_adapters::{GitAdapter, TmuxSessionAdapter, VcsAdapter};
use craizy_core::{Config, SystemClock, STATE_DIR};
use craizy_engine::{AgentService, ServiceDeps, ServiceSettings};
use craizy_storage::JsonStore;
use std::sync::Arc;

use crate::cli::{Cli, Command};
use crate::exit_error::ExitError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            eprintln!("{}", exit.message);
            std::process::exit(exit.code);
        }
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let project_dir = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine working directory")?,
    };
    let config = Config::load(&project_dir)?;
    let _log_guard = logging::init(&project_dir.join(STATE_DIR))?;

    let settings = ServiceSettings::from_config(&config);
    let span = tracing::info_span!("craizy", project = %settings.project);
    let store = JsonStore::open(config.store_path())?;
    let vcs = config
        .git
        .enabled
        .then(|| Arc::new(GitAdapter::new(&project_dir)) as Arc<dyn VcsAdapter>);
    let deps = ServiceDeps {
        sessions: Arc::new(TmuxSessionAdapter::new()),
        vcs,
        store: Arc::new(store),
    };
    let service = AgentService::new(settings, deps, SystemClock, span);

    service.prepare().await?;
    // `reconcile` runs the pass itself so it can print the report
    if !matches!(cli.command, Command::Reconcile) {
        service.reconcile().await;
    }

    commands::run(cli.command, &service, &config).await
}
