// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use craizy_core::Agent;
use craizy_engine::ReconcileReport;
use std::fmt::Write;

use crate::color;

/// Compact elapsed time: "5s", "2m", "1h", "3d"
pub fn format_age(now_ms: u64, then_ms: u64) -> String {
    let secs = now_ms.saturating_sub(then_ms) / 1000;
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3_599 => format!("{}m", secs / 60),
        3_600..=86_399 => format!("{}h", secs / 3_600),
        _ => format!("{}d", secs / 86_400),
    }
}

/// Agent table. Status is the last column so color codes never skew widths.
pub fn render_agents(agents: &[Agent], now_ms: u64, colorize: bool) -> String {
    if agents.is_empty() {
        return "No agents\n".to_string();
    }

    let rows: Vec<[String; 5]> = agents
        .iter()
        .map(|a| {
            [
                a.id.to_string(),
                a.agent_type.clone(),
                a.name.clone(),
                a.branch.clone().unwrap_or_else(|| "-".to_string()),
                format_age(now_ms, a.created_at_ms),
            ]
        })
        .collect();
    let headers = ["ID", "TYPE", "NAME", "BRANCH", "AGE"];
    let widths: Vec<usize> = (0..headers.len())
        .map(|i| rows.iter().map(|r| r[i].len()).max().unwrap_or(0).max(headers[i].len()))
        .collect();

    let mut out = String::new();
    for (h, w) in headers.iter().zip(&widths) {
        let _ = write!(out, "{h:<w$} ");
    }
    out.push_str("STATUS\n");
    for (row, agent) in rows.iter().zip(agents) {
        for (cell, w) in row.iter().zip(&widths) {
            let _ = write!(out, "{cell:<w$} ");
        }
        let status =
            if colorize { color::status(agent.status) } else { agent.status.to_string() };
        out.push_str(&status);
        out.push('\n');
    }
    out
}

pub fn render_report(report: &ReconcileReport) -> String {
    let mut out = String::new();
    for id in &report.terminated {
        let _ = writeln!(out, "Marked {id} terminated (session gone)");
    }
    for session in &report.orphans_killed {
        let _ = writeln!(out, "Killed orphaned session {session}");
    }
    if report.listing_skipped {
        out.push_str("Session backend unavailable; orphan check skipped\n");
    }
    if out.is_empty() {
        out.push_str("Nothing to reconcile\n");
    }
    out
}

/// Print captured session output between header rules.
pub fn print_capture_frame(label: &str, output: &str) {
    println!("╭── {} ──", color::header(label));
    println!("{output}");
    println!("╰── {} ──", color::header("end capture"));
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
