// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{call, call_err, scope};
use crate::{DiagnosticKind, Expression, Value};
use prepalert_core::test_support::simple_result;
use serde_json::json;

fn render(src: &str, query: serde_json::Value) -> String {
    let scope = scope().bind("query.command.q", Value::from_json(query));
    let out = Expression::parse(src).unwrap().evaluate(&scope).unwrap();
    out.as_str().unwrap().to_string()
}

fn success() -> serde_json::Value {
    let result = simple_result("q", &["a", "b"], &[&["1", "2"]]);
    json!({"fqn": "command.q", "status": "success", "error": null, "result": serde_json::to_value(&result).unwrap()})
}

#[yare::parameterized(
    table      = { "result_to_table" },
    markdown   = { "result_to_markdown" },
    jsonlines  = { "result_to_jsonlines" },
    vertical   = { "result_to_vertical" },
    borderless = { "result_to_borderless" },
)]
fn placeholders_for_every_renderer(func: &str) {
    let running = json!({"fqn": "command.q", "status": "running", "error": null, "result": null});
    assert_eq!(render(&format!("{func}(query.command.q)"), running), "[query \"command.q\" running]");

    let failed = json!({"fqn": "command.q", "status": "failed", "error": "boom", "result": null});
    assert_eq!(render(&format!("{func}(query.command.q)"), failed), "[query \"command.q\" failed: boom]");
}

#[test]
fn renderers_match_result_methods() {
    let result = simple_result("q", &["a", "b"], &[&["1", "2"]]);
    assert_eq!(render("result_to_table(query.command.q)", success()), result.to_table());
    assert_eq!(render("result_to_markdown(query.command.q)", success()), result.to_markdown_table());
    assert_eq!(render("result_to_jsonlines(query.command.q)", success()), result.to_jsonlines());
    assert_eq!(render("result_to_vertical(query.command.q)", success()), result.to_vertical());
    assert_eq!(render("result_to_borderless(query.command.q)", success()), result.to_borderless_table());
}

#[test]
fn null_renders_empty() {
    assert_eq!(call("result_to_table(null)"), json!(""));
}

#[test]
fn rejects_non_objects() {
    assert_eq!(call_err("result_to_table(\"x\")").kind, DiagnosticKind::TypeMismatch);
    assert_eq!(call_err("result_to_table({status = \"weird\"})").kind, DiagnosticKind::Function);
}
