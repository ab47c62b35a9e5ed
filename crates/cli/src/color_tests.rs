// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn force_color(on: bool) {
    if on {
        std::env::set_var("COLOR", "1");
        std::env::remove_var("NO_COLOR");
    } else {
        std::env::set_var("NO_COLOR", "1");
        std::env::remove_var("COLOR");
    }
}

#[test]
#[serial]
fn styles_follow_color_setting() {
    let plain = format!("{:?}", Styles::plain());

    force_color(true);
    assert_ne!(format!("{:?}", styles()), plain);

    force_color(false);
    assert_eq!(format!("{:?}", styles()), plain);
}

#[test]
#[serial]
fn no_color_wins_over_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::set_var("COLOR", "1");
    assert!(!should_colorize());
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn status_is_plain_without_color() {
    force_color(false);
    assert_eq!(status(AgentStatus::Active), "active");
    assert_eq!(header("ID"), "ID");
}

#[test]
#[serial]
fn active_status_is_green() {
    force_color(true);
    assert_eq!(status(AgentStatus::Active), "\x1b[38;5;114mactive\x1b[0m");
    assert_eq!(status(AgentStatus::Terminated), "\x1b[38;5;240mterminated\x1b[0m");
    force_color(false);
}
