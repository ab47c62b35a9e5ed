// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use craizy_core::test_support::AgentBuilder;
use craizy_core::AgentId;

#[yare::parameterized(
    zero          = { 0,           "0s" },
    seconds       = { 59_999,      "59s" },
    one_minute    = { 60_000,      "1m" },
    hours         = { 7_200_000,   "2h" },
    days          = { 259_200_000, "3d" },
)]
fn format_age_buckets(elapsed_ms: u64, expected: &str) {
    assert_eq!(format_age(1_000_000_000 + elapsed_ms, 1_000_000_000), expected);
}

#[test]
fn format_age_clamps_future_timestamps() {
    assert_eq!(format_age(1_000, 5_000), "0s");
}

#[test]
fn empty_agent_table() {
    assert_eq!(render_agents(&[], 0, false), "No agents\n");
}

#[test]
fn agent_table_aligns_columns() {
    let agents = vec![
        AgentBuilder::new("demo", "claude", "task1").branch_from("main").build(),
        AgentBuilder::new("demo", "sh", "x").build(),
    ];
    let out = render_agents(&agents, 1_000_000 + 120_000, false);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "ID                       TYPE   NAME  BRANCH                   AGE STATUS"
    );
    assert_eq!(
        lines[1],
        "craizy-demo-claude-task1 claude task1 craizy-demo-claude-task1 2m  active"
    );
    assert_eq!(
        lines[2],
        "craizy-demo-sh-x         sh     x     -                        2m  active"
    );
}

#[test]
fn report_lists_every_repair() {
    let report = ReconcileReport {
        terminated: vec![AgentId::new("craizy-demo-claude-a")],
        orphans_killed: vec!["craizy-demo-orphan".to_string()],
        listing_skipped: false,
    };
    assert_eq!(
        render_report(&report),
        "Marked craizy-demo-claude-a terminated (session gone)\n\
         Killed orphaned session craizy-demo-orphan\n"
    );
}

#[yare::parameterized(
    nothing = { false, "Nothing to reconcile\n" },
    skipped = { true,  "Session backend unavailable; orphan check skipped\n" },
)]
fn report_without_repairs(listing_skipped: bool, expected: &str) {
    let report = ReconcileReport { listing_skipped, ..Default::default() };
    assert_eq!(render_report(&report), expected);
}
