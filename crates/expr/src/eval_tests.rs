// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::template::Expression;
use crate::value::object;
use serde_json::json;

fn scope() -> Scope {
    Scope::with_stdlib()
        .bind("runtime.event", Value::from_json(json!({"alert": {"id": "2bj6bp5ZDBa", "monitor_name": "M", "is_open": true}})))
        .bind("runtime.params", Value::from_json(json!({"limit": 10, "tags": ["a", "b"]})))
        .with_variable("n", Value::from(3i64))
}

fn eval_ok(scope: &Scope, src: &str) -> Value {
    Expression::parse(src).unwrap().evaluate(scope).unwrap_or_else(|e| panic!("{src}: {e}"))
}

fn eval_err(scope: &Scope, src: &str) -> Diagnostic {
    Expression::parse(src).unwrap().evaluate(scope).unwrap_err().first().cloned().unwrap()
}

#[yare::parameterized(
    arithmetic      = { "1 + 2 * 3",                         json!(7) },
    division        = { "7 / 2",                             json!(3.5) },
    modulo          = { "7 % 4",                             json!(3) },
    negate          = { "-n",                                json!(-3) },
    compare         = { "n >= 3 && n < 4",                   json!(true) },
    equality        = { "\"a\" == \"a\" && 1 != 2",          json!(true) },
    int_float_eq    = { "1 == 1.0",                          json!(true) },
    attr            = { "runtime.event.alert.monitor_name",  json!("M") },
    index           = { "runtime.params.tags[1]",            json!("b") },
    string_index    = { "runtime.params[\"limit\"]",         json!(10) },
    conditional     = { "n > 1 ? \"big\" : \"small\"",       json!("big") },
    list            = { "[n, n + 1]",                        json!([3, 4]) },
    object          = { "{ a = n, \"b\": true }",            json!({"a": 3, "b": true}) },
    template_string = { "\"id=${runtime.event.alert.id}\"",  json!("id=2bj6bp5ZDBa") },
    raw_single      = { "\"${runtime.params.tags}\"",        json!(["a", "b"]) },
    call            = { "upper(runtime.event.alert.monitor_name)", json!("M") },
)]
fn evaluates(src: &str, expected: serde_json::Value) {
    assert_eq!(eval_ok(&scope(), src).to_json(), expected);
}

#[test]
fn conditional_is_lazy() {
    // the unselected arm would fail with an unknown variable
    assert_eq!(eval_ok(&scope(), "true ? 1 : nope"), Value::from(1i64));
    assert_eq!(eval_ok(&scope(), "false ? must_env(\"PREPALERT_NEVER_SET_X\") : 2"), Value::from(2i64));
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(eval_ok(&scope(), "false && nope"), Value::Bool(false));
    assert_eq!(eval_ok(&scope(), "true || nope"), Value::Bool(true));
}

#[yare::parameterized(
    attr_of_unknown  = { "u.anything.deep" },
    arithmetic       = { "u + 1" },
    comparison       = { "u < 1" },
    equality         = { "u == 1" },
    call             = { "upper(u)" },
    conditional      = { "u ? 1 : 2" },
    in_template      = { "\"x ${u} y\"" },
    index_by_unknown = { "runtime.params.tags[u]" },
    and_true         = { "true && u" },
)]
fn unknown_propagates(src: &str) {
    let scope = scope().with_variable("u", Value::Unknown);
    assert_eq!(eval_ok(&scope, src), Value::Unknown);
}

#[test]
fn unknown_and_false_is_false() {
    let scope = scope().with_variable("u", Value::Unknown);
    assert_eq!(eval_ok(&scope, "u && false"), Value::Bool(false));
    assert_eq!(eval_ok(&scope, "u || true"), Value::Bool(true));
}

#[yare::parameterized(
    undefined_root  = { "nope.x",                     DiagnosticKind::UndefinedVariable },
    missing_attr    = { "runtime.event.alert.nope",   DiagnosticKind::UnsupportedAttribute },
    attr_on_string  = { "runtime.event.alert.id.x",   DiagnosticKind::UnsupportedAttribute },
    add_string      = { "\"a\" + 1",                  DiagnosticKind::TypeMismatch },
    not_number      = { "!1",                         DiagnosticKind::TypeMismatch },
    bool_condition  = { "1 ? 2 : 3",                  DiagnosticKind::TypeMismatch },
    unknown_func    = { "nope(1)",                    DiagnosticKind::UnknownFunction },
    wrong_arity     = { "upper(\"a\", \"b\")",        DiagnosticKind::Arity },
    func_type       = { "upper(1)",                   DiagnosticKind::TypeMismatch },
    out_of_range    = { "runtime.params.tags[5]",     DiagnosticKind::InvalidIndex },
    must_env        = { "must_env(\"PREPALERT_NEVER_SET_X\")", DiagnosticKind::Function },
    div_zero        = { "1 / 0",                      DiagnosticKind::Function },
    list_in_tpl     = { "\"x ${runtime.params.tags}\"", DiagnosticKind::TypeMismatch },
)]
fn diagnostics(src: &str, kind: DiagnosticKind) {
    let err = eval_err(&scope(), src);
    assert_eq!(err.kind, kind, "{src}: {err}");
}

#[test]
fn function_type_error_points_at_argument() {
    let err = eval_err(&scope(), "join(\",\", 5)");
    assert_eq!(err.kind, DiagnosticKind::TypeMismatch);
    assert_eq!(err.span, Span::new(10, 11));
}

#[test]
fn try_returns_first_success() {
    assert_eq!(eval_ok(&scope(), "try(runtime.event.alert.nope, \"fallback\")"), Value::from("fallback"));
    assert_eq!(eval_ok(&scope(), "try(runtime.event.alert.id)"), Value::from("2bj6bp5ZDBa"));
}

#[test]
fn try_with_all_failures_is_diagnostic() {
    let err = eval_err(&scope(), "try(nope, also_nope)");
    assert_eq!(err.kind, DiagnosticKind::Function);
}

#[test]
fn try_with_unknown_is_unknown() {
    let scope = scope().with_variable("u", Value::Unknown);
    assert_eq!(eval_ok(&scope, "try(u, 1)"), Value::Unknown);
}

#[test]
fn can_reports_success() {
    assert_eq!(eval_ok(&scope(), "can(runtime.event.alert.id)"), Value::Bool(true));
    assert_eq!(eval_ok(&scope(), "can(runtime.event.host.name)"), Value::Bool(false));
    assert_eq!(eval_ok(&scope().with_variable("u", Value::Unknown), "can(u)"), Value::Unknown);
}

#[test]
fn null_attribute_access_is_diagnostic() {
    let scope = scope().bind("runtime.event.host", Value::Null);
    let err = eval_err(&scope, "runtime.event.host.name");
    assert_eq!(err.kind, DiagnosticKind::UnsupportedAttribute);
}

#[test]
fn query_object_lookup() {
    let scope = scope().bind(
        "query.command.errors",
        object([("fqn", Value::from("command.errors")), ("status", Value::from("running"))]),
    );
    assert_eq!(eval_ok(&scope, "query.command.errors.status"), Value::from("running"));
}
