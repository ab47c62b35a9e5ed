//! CLI help output specs

use crate::prelude::*;

#[test]
fn craizy_no_args_shows_usage_and_fails() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn craizy_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("create")
        .stdout_has("kill")
        .stdout_has("merge")
        .stdout_has("abort-merge")
        .stdout_has("reconcile");
}

#[test]
fn craizy_kill_help_shows_flags() {
    cli().args(&["kill", "--help"]).passes().stdout_has("--force").stdout_has("--discard");
}

#[test]
fn craizy_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1.0");
}
