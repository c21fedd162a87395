// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{call, call_err};
use crate::DiagnosticKind;
use serde_json::json;

#[yare::parameterized(
    upper        = { "upper(\"abc\")",                      json!("ABC") },
    lower        = { "lower(\"ABC\")",                      json!("abc") },
    trim         = { "trim(\"xxhixx\", \"x\")",             json!("hi") },
    trimspace    = { "trimspace(\"  hi \\n\")",             json!("hi") },
    trimprefix   = { "trimprefix(\"prod-db\", \"prod-\")",  json!("db") },
    trimsuffix   = { "trimsuffix(\"a.log\", \".log\")",     json!("a") },
    replace      = { "replace(\"a-b-c\", \"-\", \"_\")",    json!("a_b_c") },
    replace_re   = { "replace(\"a1b22\", \"/[0-9]+/\", \"#\")", json!("a#b#") },
    split        = { "split(\",\", \"a,b,,c\")",            json!(["a", "b", "", "c"]) },
    split_empty  = { "split(\",\", \"\")",                  json!([]) },
    join         = { "join(\", \", [\"a\", 1, true])",      json!("a, 1, true") },
    substr       = { "substr(\"hello\", 1, 3)",             json!("ell") },
    substr_rest  = { "substr(\"hello\", 2, -1)",            json!("llo") },
    substr_neg   = { "substr(\"hello\", -3, 2)",            json!("ll") },
    substr_huge  = { "substr(\"abc\", 1, 9223372036854775807)", json!("bc") },
    strlen       = { "strlen(\"héllo\")",                   json!(5) },
    title        = { "title(\"error rate high\")",          json!("Error Rate High") },
    startswith   = { "startswith(\"prepalert\", \"prep\")", json!(true) },
    endswith     = { "endswith(\"prepalert\", \"prep\")",   json!(false) },
    contains_str = { "contains(\"prepalert\", \"pal\")",    json!(true) },
    contains_lst = { "contains([1, 2], 2)",                 json!(true) },
    format_mixed = { "format(\"%s=%d (%.1f%%) %t\", \"n\", 3.9, 0.26, true)", json!("n=3 (0.3%) true") },
    format_q     = { "format(\"%q\", \"a\\\"b\")",          json!("\"a\\\"b\"") },
)]
fn string_functions(src: &str, expected: serde_json::Value) {
    assert_eq!(call(src), expected);
}

#[yare::parameterized(
    bad_regex     = { "replace(\"a\", \"/(/\", \"\")" },
    format_short  = { "format(\"%s %s\", \"a\")" },
    format_extra  = { "format(\"%s\", \"a\", \"b\")" },
    join_object   = { "join(\",\", [{}])" },
)]
fn string_function_errors(src: &str) {
    assert_eq!(call_err(src).kind, DiagnosticKind::Function);
}

#[test]
fn contains_rejects_numbers() {
    assert_eq!(call_err("contains(1, 1)").kind, DiagnosticKind::TypeMismatch);
}
