// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::helpers::{sexp, template};
use crate::ast::TemplatePart;

fn literal(s: &str) -> TemplatePart {
    TemplatePart::Literal(s.to_string())
}

#[test]
fn plain_text() {
    assert_eq!(template("hello world"), vec![literal("hello world")]);
    assert_eq!(template(""), vec![]);
}

#[test]
fn quotes_and_backslashes_are_literal_outside_strings() {
    assert_eq!(template("say \"hi\" \\n"), vec![literal("say \"hi\" \\n")]);
}

#[test]
fn interpolation_splits_literals() {
    let parts = template("a ${x} b");
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], literal("a "));
    let TemplatePart::Interpolation(e) = &parts[1] else { panic!("expected interpolation") };
    assert_eq!(sexp(e), "x");
    assert_eq!(parts[2], literal(" b"));
}

#[test]
fn escapes_produce_literal_markers() {
    assert_eq!(template("$${x} %%{if}"), vec![literal("${x} %{if}")]);
}

#[test]
fn object_literal_inside_interpolation() {
    let parts = template("${jsonencode({a = 1})}");
    let TemplatePart::Interpolation(e) = &parts[0] else { panic!("expected interpolation") };
    assert_eq!(sexp(e), "(jsonencode {a=1})");
}

#[test]
fn nested_string_with_interpolation() {
    let parts = template("${upper(\"x-${y}\")}!");
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[1], literal("!"));
}

#[test]
fn if_else_directive() {
    let parts = template("%{ if ok }yes%{ else }no%{ endif }");
    let [TemplatePart::If { cond, then, otherwise }] = parts.as_slice() else { panic!("expected if") };
    assert_eq!(sexp(cond), "ok");
    assert_eq!(then, &vec![literal("yes")]);
    assert_eq!(otherwise, &vec![literal("no")]);
}

#[test]
fn for_directive_with_key() {
    let parts = template("%{ for k, v in m }${k}=${v};%{ endfor }");
    let [TemplatePart::For { key, value, collection, body }] = parts.as_slice() else { panic!("expected for") };
    assert_eq!(key.as_deref(), Some("k"));
    assert_eq!(value, "v");
    assert_eq!(sexp(collection), "m");
    assert_eq!(body.len(), 4);
}

#[test]
fn strip_markers_trim_adjacent_whitespace() {
    let parts = template("a   ${~ x ~}   b");
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], literal("a"));
    assert_eq!(parts[2], literal("b"));
}

#[test]
fn strip_marker_on_directive_trims_body() {
    let parts = template("%{ for x in xs ~}\n  ${x}\n%{~ endfor }");
    let [TemplatePart::For { body, .. }] = parts.as_slice() else { panic!("expected for") };
    assert_eq!(body.len(), 1);
}
