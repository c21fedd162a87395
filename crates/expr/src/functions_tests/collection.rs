// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{call, call_err};
use crate::DiagnosticKind;
use serde_json::json;

#[yare::parameterized(
    length_list   = { "length([1, 2, 3])",                        json!(3) },
    length_object = { "length({a = 1})",                          json!(1) },
    length_string = { "length(\"héllo\")",                        json!(5) },
    concat        = { "concat([1], [], [2, 3])",                  json!([1, 2, 3]) },
    keys_sorted   = { "keys({b = 1, a = 2})",                     json!(["a", "b"]) },
    values_sorted = { "values({b = 1, a = 2})",                   json!([2, 1]) },
    lookup_hit    = { "lookup({a = 1}, \"a\")",                   json!(1) },
    lookup_miss   = { "lookup({a = 1}, \"b\", \"dflt\")",         json!("dflt") },
    element_wraps = { "element([\"a\", \"b\"], 3)",               json!("b") },
    flatten       = { "flatten([[1, [2]], 3])",                   json!([1, 2, 3]) },
    distinct      = { "distinct([1, 2, 1, \"1\"])",               json!([1, 2, "1"]) },
    reverse       = { "reverse([1, 2, 3])",                       json!([3, 2, 1]) },
    sort_strings  = { "sort([\"b\", \"a\", \"c\"])",              json!(["a", "b", "c"]) },
    sort_numbers  = { "sort([10, 9, 100])",                       json!([9, 10, 100]) },
    range_one     = { "range(3)",                                 json!([0, 1, 2]) },
    range_step    = { "range(1, 10, 4)",                          json!([1, 5, 9]) },
    range_down    = { "range(3, 0)",                              json!([3, 2, 1]) },
    coalesce      = { "coalesce(null, \"\", \"x\", \"y\")",       json!("x") },
    coalesce_none = { "coalesce(null, \"\")",                     json!(null) },
)]
fn collection_functions(src: &str, expected: serde_json::Value) {
    assert_eq!(call(src), expected);
}

#[yare::parameterized(
    lookup_missing = { "lookup({a = 1}, \"b\")" },
    element_empty  = { "element([], 0)" },
    sort_mixed     = { "sort([1, \"a\"])" },
    range_zero     = { "range(0, 5, 0)" },
)]
fn collection_function_errors(src: &str) {
    assert_eq!(call_err(src).kind, DiagnosticKind::Function);
}

#[test]
fn keys_requires_object() {
    assert_eq!(call_err("keys([1])").kind, DiagnosticKind::TypeMismatch);
}
