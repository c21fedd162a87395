// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    seconds  = { "30s",   30 },
    minutes  = { "15m",   900 },
    hours    = { "1h",    3600 },
    combined = { "1h30m", 5400 },
    padded   = { " 2m ",  120 },
)]
fn parses(input: &str, secs: u64) {
    assert_eq!(parse_duration(input).unwrap(), Duration::from_secs(secs));
}

#[yare::parameterized(
    empty     = { "" },
    no_unit   = { "15" },
    bad_unit  = { "3d" },
    no_digits = { "m" },
    zero      = { "0s" },
    overflow  = { "99999999999999999999h" },
)]
fn rejects(input: &str) {
    assert!(parse_duration(input).is_err(), "{input:?} should be rejected");
}
