// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{call, call_err, NOW};
use crate::DiagnosticKind;
use serde_json::json;

#[test]
fn now_reads_clock() {
    assert_eq!(call("now()"), json!(NOW));
}

#[yare::parameterized(
    utc          = { "strftime(\"%Y-%m-%d %H:%M:%S\", 1700000000)",                      "2023-11-14 22:13:20" },
    in_utc       = { "strftime_in_zone(\"%H:%M\", \"UTC\", 1700000000)",                 "22:13" },
    in_offset    = { "strftime_in_zone(\"%Y-%m-%d %H:%M %:z\", \"+09:00\", 1700000000)", "2023-11-15 07:13 +09:00" },
    in_negative  = { "strftime_in_zone(\"%H:%M\", \"-0530\", 1700000000)",               "16:43" },
    from_now     = { "strftime(\"%Y\", now())",                                          "2023" },
)]
fn formats(src: &str, expected: &str) {
    assert_eq!(call(src), json!(expected));
}

#[yare::parameterized(
    named_zone   = { "strftime_in_zone(\"%H\", \"Asia/Tokyo\", 0)" },
    bad_offset   = { "strftime_in_zone(\"%H\", \"+9\", 0)" },
    bad_format   = { "strftime(\"%Q\", 0)" },
)]
fn time_errors(src: &str) {
    assert_eq!(call_err(src).kind, DiagnosticKind::Function);
}
