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
fn styles_follow_color_switches() {
    let plain = format!("{:?}", Styles::plain());

    force_color(true);
    assert_ne!(format!("{:?}", styles()), plain);

    force_color(false);
    assert_eq!(format!("{:?}", styles()), plain);
}

#[test]
#[serial]
fn header_is_painted_when_forced() {
    force_color(true);
    assert_eq!(header("memo"), "\x1b[38;5;74mmemo\x1b[0m");
    assert_eq!(context("x"), "\x1b[38;5;245mx\x1b[0m");
}

#[test]
#[serial]
fn no_color_leaves_text_alone() {
    force_color(false);
    assert_eq!(header("memo"), "memo");
    assert_eq!(context("x"), "x");
}
