// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod blocks;
mod references;
mod validation;

use crate::{parse_config, Config, ConfigError};

fn parse(hcl: &str) -> Config {
    parse_config(hcl).unwrap_or_else(|e| panic!("config should parse: {e}"))
}

/// Parse, expect a validation error, and return `(location, message)`.
fn invalid(hcl: &str) -> (String, String) {
    match parse_config(hcl) {
        Err(ConfigError::Invalid { location, message }) => (location, message),
        Err(other) => panic!("expected a validation error, got: {other}"),
        Ok(_) => panic!("expected a validation error, config parsed"),
    }
}
