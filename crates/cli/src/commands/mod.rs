// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

use anyhow::{bail, Result};
use craizy_core::{AgentId, Clock, Config};
use craizy_engine::AgentService;

use crate::cli::Command;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{print_capture_frame, render_agents, render_report};

pub async fn run<C: Clock>(
    command: Command,
    service: &AgentService<C>,
    config: &Config,
) -> Result<()> {
    match command {
        Command::Create { agent_type, name, command } => {
            let command = command.unwrap_or_else(|| config.command_for(&agent_type));
            let agent = service.create(&agent_type, &name, &command).await?;
            // Session start and persistence happen in handlers that only log failures
            if !service.exists(&agent.id) {
                bail!("agent {} did not start; see .craizy/craizy.log", agent.id);
            }
            println!("Created {}", agent.id);
            println!("  workdir: {}", agent.work_dir.display());
            if let Some(branch) = &agent.branch {
                println!("  branch:  {branch}");
            }
        }
        Command::Kill { id, force, discard } => {
            let id = known_agent(service, &id)?;
            if force {
                service.force_kill(&id, discard).await;
            } else {
                if service.check_kill(&id).await? {
                    return Err(ExitError::blocked(format!(
                        "{id} has uncommitted changes; use --force to stash them \
                         or --force --discard to drop them"
                    ))
                    .into());
                }
                service.kill(&id).await;
            }
            println!("Killed {id}");
        }
        Command::Check { id } => {
            let id = known_agent(service, &id)?;
            if service.check_kill(&id).await? {
                println!("{id}: uncommitted changes");
            } else {
                println!("{id}: clean");
            }
        }
        Command::Merge { id } => {
            let id = known_agent(service, &id)?;
            let result = service.merge_agent(&id).await?;
            if let Some(err) = result.conflict_err {
                let mut message = format!("merge of {id} failed: {err}");
                if result.stashed {
                    message.push_str("\nlocal changes were stashed and have been restored");
                }
                message.push_str("\nresolve and commit, or run `craizy abort-merge`");
                return Err(ExitError::blocked(message).into());
            }
            println!("Merged {id}");
            if result.stashed {
                println!("  local changes were stashed and restored");
            }
        }
        Command::AbortMerge => {
            service.abort_merge().await?;
            println!("Merge aborted");
        }
        Command::List { json } => {
            let agents = service.list();
            if json {
                println!("{}", serde_json::to_string_pretty(&agents)?);
            } else {
                let now = craizy_core::SystemClock.epoch_ms();
                print!("{}", render_agents(&agents, now, color::should_colorize()));
            }
        }
        Command::Attach { id } => {
            let id = known_agent(service, &id)?;
            let outcome = service.attach(&id).await?;
            if let Some(err) = outcome.error {
                bail!("attach to {} failed: {err}", outcome.session_id);
            }
        }
        Command::Capture { id, lines } => {
            let id = known_agent(service, &id)?;
            let output = service.capture_output(&id, lines).await?;
            print_capture_frame(id.as_str(), &output);
        }
        Command::Reconcile => {
            let report = service.reconcile().await;
            print!("{}", render_report(&report));
        }
    }
    Ok(())
}

fn known_agent<C: Clock>(service: &AgentService<C>, id: &str) -> Result<AgentId> {
    let id = AgentId::new(id);
    if !service.exists(&id) {
        bail!("agent not found: {id}");
    }
    Ok(id)
}
