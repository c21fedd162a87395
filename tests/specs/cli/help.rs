// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("validate").stdout_has("exec");
}

#[test]
fn exec_help_mentions_dry_run() {
    cli().args(&["exec", "--help"]).passes().stdout_has("--dry-run");
}

#[test]
fn version_shows_package_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn missing_command_is_a_usage_error() {
    cli().exits_with(2).stderr_has("Usage:");
}
