// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for parser tests.

use crate::ast::*;
use crate::parser::Parser;
use crate::value::Value;

pub fn expr(src: &str) -> Expr {
    Parser::parse_expression(src).unwrap_or_else(|e| panic!("parse {src:?}: {e}"))
}

pub fn template(src: &str) -> Vec<TemplatePart> {
    Parser::parse_template(src).unwrap_or_else(|e| panic!("parse {src:?}: {e}"))
}

pub fn var(name: &str) -> ExprKind {
    ExprKind::Variable(name.to_string())
}

pub fn lit(v: impl Into<Value>) -> ExprKind {
    ExprKind::Literal(v.into())
}

/// Render an expression tree as a compact s-expression for assertions.
pub fn sexp(e: &Expr) -> String {
    match &e.kind {
        ExprKind::Literal(Value::String(s)) => format!("{s:?}"),
        ExprKind::Literal(v) => v.to_json().to_string(),
        ExprKind::Template(parts) => format!("(tpl {})", parts.len()),
        ExprKind::Variable(name) => name.clone(),
        ExprKind::GetAttr(t, name) => format!("{}.{name}", sexp(t)),
        ExprKind::Index(t, i) => format!("{}[{}]", sexp(t), sexp(i)),
        ExprKind::List(items) => format!("[{}]", items.iter().map(sexp).collect::<Vec<_>>().join(" ")),
        ExprKind::Object(entries) => {
            let inner: Vec<String> = entries
                .iter()
                .map(|(k, v)| match k {
                    ObjectKey::Name(n) => format!("{n}={}", sexp(v)),
                    ObjectKey::Expr(k) => format!("({})={}", sexp(k), sexp(v)),
                })
                .collect();
            format!("{{{}}}", inner.join(" "))
        }
        ExprKind::Call { name, args } => {
            format!("({name} {})", args.iter().map(sexp).collect::<Vec<_>>().join(" "))
        }
        ExprKind::Unary(UnaryOp::Not, x) => format!("(! {})", sexp(x)),
        ExprKind::Unary(UnaryOp::Neg, x) => format!("(- {})", sexp(x)),
        ExprKind::Binary(op, l, r) => format!("({op} {} {})", sexp(l), sexp(r)),
        ExprKind::Conditional { cond, then, otherwise } => {
            format!("(? {} {} {})", sexp(cond), sexp(then), sexp(otherwise))
        }
    }
}
