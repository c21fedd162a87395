// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{call, call_err};
use crate::DiagnosticKind;
use serde_json::json;

#[yare::parameterized(
    abs        = { "abs(-2.5)",               json!(2.5) },
    ceil       = { "ceil(1.2)",               json!(2) },
    floor      = { "floor(-1.2)",             json!(-2) },
    max        = { "max(1, 7, 3)",            json!(7) },
    min        = { "min(4, -1)",              json!(-1) },
    pow        = { "pow(2, 10)",              json!(1024) },
    parseint   = { "parseint(\"ff\", 16)",    json!(255) },
    tostring_n = { "tostring(12)",            json!("12") },
    tostring_b = { "tostring(false)",         json!("false") },
    tostring_0 = { "tostring(null)",          json!(null) },
    tonumber   = { "tonumber(\" 42 \")",      json!(42) },
    tonumber_f = { "tonumber(\"0.5\")",       json!(0.5) },
)]
fn math_functions(src: &str, expected: serde_json::Value) {
    assert_eq!(call(src), expected);
}

#[yare::parameterized(
    parseint_bad  = { "parseint(\"zz\", 10)" },
    parseint_base = { "parseint(\"1\", 1)" },
    tonumber_bad  = { "tonumber(\"abc\")" },
)]
fn math_function_errors(src: &str) {
    assert_eq!(call_err(src).kind, DiagnosticKind::Function);
}

#[test]
fn tostring_rejects_collections() {
    assert_eq!(call_err("tostring([1])").kind, DiagnosticKind::TypeMismatch);
}
