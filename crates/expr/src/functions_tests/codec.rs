// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{call, call_err};
use crate::DiagnosticKind;
use serde_json::json;

#[test]
fn jsonencode_keeps_key_order() {
    assert_eq!(call("jsonencode({z = 1, a = [true, null]})"), json!("{\"z\":1,\"a\":[true,null]}"));
}

#[test]
fn jsondecode_parses() {
    assert_eq!(call("jsondecode(\"{\\\"a\\\": [1, 2.5]}\").a[1]"), json!(2.5));
}

#[test]
fn yaml_round_trip() {
    assert_eq!(call("yamlencode({a = 1})"), json!("a: 1\n"));
    assert_eq!(call("yamldecode(\"a:\\n  - x\\n  - y\\n\")"), json!({"a": ["x", "y"]}));
}

#[yare::parameterized(
    bad_json = { "jsondecode(\"{\")" },
    bad_yaml = { "yamldecode(\"a: [\")" },
)]
fn decode_errors(src: &str) {
    assert_eq!(call_err(src).kind, DiagnosticKind::Function);
}
