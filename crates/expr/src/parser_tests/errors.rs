// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::diagnostic::DiagnosticKind;
use crate::parser::Parser;
use crate::span::Span;

#[yare::parameterized(
    unclosed_interpolation = { "a ${x" },
    unclosed_string        = { "${\"abc}" },
    missing_endif          = { "%{ if x }a" },
    missing_endfor         = { "%{ for x in y }a" },
    stray_endif            = { "a%{ endif }" },
    unknown_directive      = { "%{ while x }" },
    bad_escape             = { "${\"\\q\"}" },
    dangling_operator      = { "${1 +}" },
    missing_colon          = { "${a ? b}" },
)]
fn template_syntax_errors(src: &str) {
    let err = Parser::parse_template(src).unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::Syntax, "{src}: {err}");
}

#[test]
fn trailing_tokens_rejected() {
    let err = Parser::parse_expression("a b").unwrap_err();
    assert_eq!(err.span, Span::new(2, 3));
}

#[test]
fn error_span_points_at_token() {
    let err = Parser::parse_template("ok ${ 1 + ] }").unwrap_err();
    assert_eq!(err.span, Span::new(10, 11));
    assert!(err.detail.contains("']'"), "{}", err.detail);
}
