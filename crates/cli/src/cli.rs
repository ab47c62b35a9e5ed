// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::color;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")");

#[derive(Parser)]
#[command(name = "craizy", version = VERSION, styles = color::styles())]
#[command(about = "Launch, track and tear down agent sessions")]
pub struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start a new agent in its own session and worktree
    Create {
        /// Agent type, e.g. `claude`
        agent_type: String,
        /// Agent name, unique within the type
        name: String,
        /// Command to run (defaults to the configured command for the type)
        #[arg(long)]
        command: Option<String>,
    },
    /// Stop an agent and remove its worktree and branch
    Kill {
        /// Agent ID
        id: String,
        /// Kill even with uncommitted changes (they are stashed)
        #[arg(long)]
        force: bool,
        /// With --force, drop uncommitted changes instead of stashing them
        #[arg(long, requires = "force")]
        discard: bool,
    },
    /// Report whether an agent's worktree has uncommitted changes
    Check {
        /// Agent ID
        id: String,
    },
    /// Merge an agent's branch into the current branch
    Merge {
        /// Agent ID
        id: String,
    },
    /// Abort a conflicted merge
    AbortMerge,
    /// List active agents of this project
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Attach the terminal to an agent's session
    Attach {
        /// Agent ID
        id: String,
    },
    /// Print the tail of an agent's session output
    Capture {
        /// Agent ID
        id: String,
        /// Number of lines
        #[arg(long, short = 'n', default_value_t = 50)]
        lines: u32,
    },
    /// Repair divergence between stored agents and live sessions
    Reconcile,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
