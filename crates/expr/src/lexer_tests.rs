// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    Lexer::tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
}

fn ident(s: &str) -> TokenKind {
    TokenKind::Ident(s.to_string())
}

fn num(s: &str) -> TokenKind {
    TokenKind::Number(s.to_string())
}

#[test]
fn attribute_chain() {
    assert_eq!(
        kinds("query.command.errors"),
        vec![ident("query"), TokenKind::Dot, ident("command"), TokenKind::Dot, ident("errors"), TokenKind::Eof]
    );
}

#[yare::parameterized(
    integer  = { "42",    "42" },
    fraction = { "1.25",  "1.25" },
    exponent = { "2e10",  "2e10" },
    signed   = { "1e-3",  "1e-3" },
)]
fn numbers(src: &str, text: &str) {
    assert_eq!(kinds(src), vec![num(text), TokenKind::Eof]);
}

#[test]
fn digit_after_dot_is_integer_index() {
    assert_eq!(
        kinds("a.0.1"),
        vec![ident("a"), TokenKind::Dot, num("0"), TokenKind::Dot, num("1"), TokenKind::Eof]
    );
}

#[test]
fn two_char_operators() {
    assert_eq!(
        kinds("a == b && c != d || e <= f >= g"),
        vec![
            ident("a"),
            TokenKind::EqEq,
            ident("b"),
            TokenKind::AndAnd,
            ident("c"),
            TokenKind::NotEq,
            ident("d"),
            TokenKind::OrOr,
            ident("e"),
            TokenKind::Le,
            ident("f"),
            TokenKind::Ge,
            ident("g"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn identifiers_may_contain_dashes() {
    assert_eq!(kinds("high-error rate"), vec![ident("high-error"), ident("rate"), TokenKind::Eof]);
}

#[test]
fn strip_marker_closes() {
    assert_eq!(kinds("x ~}"), vec![ident("x"), TokenKind::TildeRBrace, TokenKind::Eof]);
}

#[test]
fn spans_cover_tokens() {
    let tokens = Lexer::tokenize("  foo(1)").unwrap();
    assert_eq!(tokens[0].span, Span::new(2, 5));
    assert_eq!(tokens[2].span, Span::new(6, 7));
}

#[test]
fn unexpected_character() {
    let err = Lexer::tokenize("a @ b").unwrap_err();
    assert_eq!(err.span, Span::new(2, 3));
    assert!(err.detail.contains('@'));
}
