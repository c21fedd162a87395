// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::helpers::{expr, lit, sexp, var};
use crate::ast::ExprKind;

#[yare::parameterized(
    mul_before_add    = { "1 + 2 * 3",           "(+ 1 (* 2 3))" },
    left_assoc        = { "10 - 4 - 3",          "(- (- 10 4) 3)" },
    compare_over_and  = { "a < 1 && b >= 2",     "(&& (< a 1) (>= b 2))" },
    and_over_or       = { "a || b && c",         "(|| a (&& b c))" },
    eq_over_and       = { "a == 1 && b != 2",    "(&& (== a 1) (!= b 2))" },
    unary_binds_tight = { "!a && -b < 0",        "(&& (! a) (< (- b) 0))" },
    parens            = { "(1 + 2) * 3",         "(* (+ 1 2) 3)" },
    conditional       = { "a ? b : c ? d : e",   "(? a b (? c d e))" },
    cond_lowest       = { "x > 1 ? \"hi\" : \"lo\"", "(? (> x 1) \"hi\" \"lo\")" },
)]
fn precedence(src: &str, expected: &str) {
    assert_eq!(sexp(&expr(src)), expected);
}

#[yare::parameterized(
    attr_chain    = { "query.command.errors.result", "query.command.errors.result" },
    string_index  = { "a[\"k\"].b",                   "a[\"k\"].b" },
    number_index  = { "rows[0][1]",                  "rows[0][1]" },
    legacy_index  = { "rows.0.1",                    "rows[0][1]" },
    call_postfix  = { "f(x).y",                      "(f x).y" },
)]
fn postfix(src: &str, expected: &str) {
    assert_eq!(sexp(&expr(src)), expected);
}

#[test]
fn literals() {
    assert_eq!(expr("true").kind, lit(true));
    assert_eq!(expr("null").kind, ExprKind::Literal(crate::value::Value::Null));
    assert_eq!(expr("42").kind, lit(42i64));
    assert_eq!(expr("1.5").kind, lit(1.5));
    assert_eq!(expr("\"a\\tb\"").kind, lit("a\tb"));
    assert_eq!(expr("\"\\u00e9\"").kind, lit("é"));
    assert_eq!(expr("name").kind, var("name"));
}

#[test]
fn collections() {
    assert_eq!(sexp(&expr("[1, \"two\", [3],]")), "[1 \"two\" [3]]");
    assert_eq!(sexp(&expr("{ a = 1, \"b\": 2 }")), "{a=1 (\"b\")=2}");
    assert_eq!(sexp(&expr("{\n  a = 1\n  b = x\n}")), "{a=1 b=x}");
    assert_eq!(sexp(&expr("{ (k) = v }")), "{(k)=v}");
    assert_eq!(sexp(&expr("[]")), "[]");
}

#[test]
fn calls() {
    assert_eq!(sexp(&expr("f()")), "(f )");
    assert_eq!(sexp(&expr("join(\",\", [a, b])")), "(join \",\" [a b])");
    assert_eq!(sexp(&expr("try(a.b, \"x\")")), "(try a.b \"x\")");
}

#[test]
fn quoted_interpolation_is_template() {
    let e = expr("\"id=${runtime.event.alert.id}!\"");
    let ExprKind::Template(parts) = e.kind else { panic!("expected template") };
    assert_eq!(parts.len(), 3);
}

#[test]
fn spans_cover_whole_expression() {
    let e = expr("  a.b + 10");
    assert_eq!(e.span.start, 2);
    assert_eq!(e.span.end, 10);
}
