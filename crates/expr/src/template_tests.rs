// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::diagnostic::DiagnosticKind;
use crate::value::object;
use serde_json::json;

fn render(src: &str, scope: &Scope) -> Value {
    Template::parse(src).unwrap().render(scope).unwrap_or_else(|e| panic!("{src}: {e}"))
}

fn scope() -> Scope {
    Scope::with_stdlib().bind(
        "runtime.event",
        Value::from_json(json!({"alert": {"id": "2bj6bp5ZDBa", "monitor_name": "Error rate", "is_open": true}})),
    )
}

#[test]
fn renders_plain_text() {
    assert_eq!(render("ok", &Scope::new()), Value::from("ok"));
}

#[test]
fn renders_interpolations() {
    assert_eq!(
        render("alert ${runtime.event.alert.id} on ${runtime.event.alert.monitor_name}", &scope()),
        Value::from("alert 2bj6bp5ZDBa on Error rate")
    );
}

#[test]
fn numbers_render_without_fraction() {
    let scope = Scope::new().with_variable("n", Value::from(4i64));
    assert_eq!(render("${n / 2} ${n / 8}", &scope), Value::from("2 0.5"));
}

#[test]
fn null_renders_empty() {
    let scope = Scope::new().with_variable("x", Value::Null);
    assert_eq!(render("[${x}]", &scope), Value::from("[]"));
}

#[test]
fn if_directive() {
    let src = "%{ if runtime.event.alert.is_open }OPEN%{ else }CLOSED%{ endif }";
    assert_eq!(render(src, &scope()), Value::from("OPEN"));
}

#[test]
fn for_directive_over_list_and_object() {
    let scope = Scope::new()
        .with_variable("xs", Value::from_json(json!(["a", "b"])))
        .with_variable("m", Value::from_json(json!({"k1": 1, "k2": 2})));
    assert_eq!(render("%{ for i, x in xs }${i}:${x} %{ endfor }", &scope), Value::from("0:a 1:b "));
    assert_eq!(render("%{ for k, v in m }${k}=${v};%{ endfor }", &scope), Value::from("k1=1;k2=2;"));
}

#[test]
fn strip_markers() {
    let scope = Scope::new().with_variable("xs", Value::from_json(json!(["a", "b"])));
    let src = "list:\n%{ for x in xs ~}\n- ${x}\n%{ endfor ~}\ndone";
    assert_eq!(render(src, &scope), Value::from("list:\n- a\n- b\ndone"));
}

#[test]
fn escaped_markers_are_literal() {
    assert_eq!(render("$${not} %%{ if }", &Scope::new()), Value::from("${not} %{ if }"));
}

#[test]
fn unknown_makes_whole_render_unknown() {
    let scope = Scope::with_stdlib().with_variable("runtime", Value::Unknown);
    assert_eq!(render("id: ${runtime.event.alert.id}", &scope), Value::Unknown);
    assert_eq!(render("%{ if runtime.x }a%{ endif }", &scope), Value::Unknown);
    assert_eq!(render("static", &scope), Value::from("static"));
}

#[test]
fn render_string_unwraps() {
    let t = Template::parse("${upper(\"x\")}").unwrap();
    assert_eq!(t.render_string(&scope()).unwrap().as_deref(), Some("X"));
    let scope = Scope::with_stdlib().with_variable("u", Value::Unknown);
    assert_eq!(Template::parse("${u}").unwrap().render_string(&scope).unwrap(), None);
}

#[test]
fn result_placeholders() {
    let scope = Scope::with_stdlib()
        .bind(
            "query.command.slow",
            object([("fqn", Value::from("command.slow")), ("status", Value::from("running"))]),
        )
        .bind(
            "query.command.broken",
            object([
                ("fqn", Value::from("command.broken")),
                ("status", Value::from("failed")),
                ("error", Value::from("boom")),
            ]),
        );
    assert_eq!(
        render("${result_to_table(query.command.slow)}|${result_to_table(query.command.broken)}", &scope),
        Value::from("[query \"command.slow\" running]|[query \"command.broken\" failed: boom]")
    );
}

#[test]
fn result_table_renders_success() {
    let result = prepalert_core::test_support::simple_result("q", &["a", "b"], &[&["1", "2"]]);
    let scope = Scope::with_stdlib().bind(
        "query.command.q",
        object([
            ("fqn", Value::from("command.q")),
            ("status", Value::from("success")),
            ("result", Value::from_serialize(&result).unwrap()),
        ]),
    );
    let from_query = render("${result_to_table(query.command.q)}", &scope);
    let from_result = render("${result_to_table(query.command.q.result)}", &scope);
    assert_eq!(from_query, from_result);
    let text = from_query.as_str().unwrap().to_string();
    assert!(text.contains('a') && text.contains('b'), "{text}");
    assert!(text.contains('1') && text.contains('2'), "{text}");
    assert_eq!(text, result.to_table());
}

#[test]
fn references_collect_static_paths() {
    let t = Template::parse(
        "${result_to_table(query.command.a)} ${query.command.b.result.rows[0]} %{ for q in [query.x.c] }${q.fqn}%{ endfor }",
    )
    .unwrap();
    let paths: Vec<String> = t
        .references()
        .into_iter()
        .map(|r| std::iter::once(r.root).chain(r.path).collect::<Vec<_>>().join("."))
        .collect();
    assert_eq!(paths, vec!["query.command.a", "query.command.b.result.rows", "query.x.c"]);
}

#[test]
fn functions_are_listed_with_spans() {
    let t = Template::parse("${upper(lower(\"x\"))} ${try(nope(1), 2)}").unwrap();
    let names: Vec<String> = t.functions().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["upper", "lower", "try", "nope"]);
}

#[test]
fn parse_error_renders_location() {
    let err = Template::parse("line one\n${ 1 + }").unwrap_err();
    assert!(err.has_kind(DiagnosticKind::Syntax));
    let rendered = err.render("line one\n${ 1 + }");
    assert!(rendered.contains("--> line 2, column 8"), "{rendered}");
}

#[test]
fn expression_parse_and_evaluate() {
    let e = Expression::parse("length(runtime.event.alert.id) > 3").unwrap();
    assert_eq!(e.evaluate(&scope()).unwrap(), Value::Bool(true));
    assert_eq!(e.source(), "length(runtime.event.alert.id) > 3");
}
