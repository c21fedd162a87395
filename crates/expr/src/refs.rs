// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static analysis over syntax trees: variable traversals and function names.

use crate::ast::{Expr, ExprKind, ObjectKey, TemplatePart};
use crate::span::Span;
use crate::value::Value;

/// A static variable path such as `query.command.errors.result`.
///
/// The path stops at the first step that is not a literal attribute name or
/// string index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    pub root: String,
    pub path: Vec<String>,
    pub span: Span,
}

impl Traversal {
    /// The first `n` steps after the root, if the path is that long.
    pub fn prefix(&self, n: usize) -> Option<&[String]> {
        self.path.get(..n)
    }
}

pub(crate) fn expr_traversals(expr: &Expr, out: &mut Vec<Traversal>) {
    if let Some(t) = as_traversal(expr) {
        out.push(t);
    }
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Variable(_) => {}
        ExprKind::Template(parts) => template_traversals(parts, out),
        ExprKind::GetAttr(target, _) => inner_traversals(target, out),
        ExprKind::Index(target, index) => {
            inner_traversals(target, out);
            expr_traversals(index, out);
        }
        ExprKind::List(items) => items.iter().for_each(|e| expr_traversals(e, out)),
        ExprKind::Object(entries) => {
            for (key, value) in entries {
                if let ObjectKey::Expr(k) = key {
                    expr_traversals(k, out);
                }
                expr_traversals(value, out);
            }
        }
        ExprKind::Call { args, .. } => args.iter().for_each(|e| expr_traversals(e, out)),
        ExprKind::Unary(_, operand) => expr_traversals(operand, out),
        ExprKind::Binary(_, l, r) => {
            expr_traversals(l, out);
            expr_traversals(r, out);
        }
        ExprKind::Conditional { cond, then, otherwise } => {
            expr_traversals(cond, out);
            expr_traversals(then, out);
            expr_traversals(otherwise, out);
        }
    }
}

/// Descend into the target of an attribute or index step without
/// reporting it again as its own (shorter) traversal.
fn inner_traversals(expr: &Expr, out: &mut Vec<Traversal>) {
    match &expr.kind {
        ExprKind::GetAttr(target, _) => inner_traversals(target, out),
        ExprKind::Index(target, index) => {
            inner_traversals(target, out);
            expr_traversals(index, out);
        }
        ExprKind::Variable(_) => {}
        _ => expr_traversals(expr, out),
    }
}

/// The longest static path rooted at a variable, if `expr` is one.
fn as_traversal(expr: &Expr) -> Option<Traversal> {
    let mut path = Vec::new();
    let mut current = expr;
    loop {
        match &current.kind {
            ExprKind::Variable(root) => {
                path.reverse();
                return Some(Traversal { root: root.clone(), path, span: expr.span });
            }
            ExprKind::GetAttr(target, name) => {
                path.push(name.clone());
                current = target;
            }
            ExprKind::Index(target, index) => {
                match &index.kind {
                    ExprKind::Literal(Value::String(k)) => path.push(k.clone()),
                    // steps after a dynamic index are not static
                    _ => path.clear(),
                }
                current = target;
            }
            _ => return None,
        }
    }
}

pub(crate) fn template_traversals(parts: &[TemplatePart], out: &mut Vec<Traversal>) {
    for part in parts {
        match part {
            TemplatePart::Literal(_) => {}
            TemplatePart::Interpolation(e) => expr_traversals(e, out),
            TemplatePart::If { cond, then, otherwise } => {
                expr_traversals(cond, out);
                template_traversals(then, out);
                template_traversals(otherwise, out);
            }
            TemplatePart::For { key, value, collection, body } => {
                expr_traversals(collection, out);
                let mut inner = Vec::new();
                template_traversals(body, &mut inner);
                // Loop variables shadow outer names inside the body
                out.extend(
                    inner.into_iter().filter(|t| &t.root != value && key.as_ref() != Some(&t.root)),
                );
            }
        }
    }
}

pub(crate) fn expr_functions(expr: &Expr, out: &mut Vec<(String, Span)>) {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Variable(_) => {}
        ExprKind::Template(parts) => template_functions(parts, out),
        ExprKind::GetAttr(target, _) => expr_functions(target, out),
        ExprKind::Index(target, index) => {
            expr_functions(target, out);
            expr_functions(index, out);
        }
        ExprKind::List(items) => items.iter().for_each(|e| expr_functions(e, out)),
        ExprKind::Object(entries) => {
            for (key, value) in entries {
                if let ObjectKey::Expr(k) = key {
                    expr_functions(k, out);
                }
                expr_functions(value, out);
            }
        }
        ExprKind::Call { name, args } => {
            out.push((name.clone(), expr.span));
            args.iter().for_each(|e| expr_functions(e, out));
        }
        ExprKind::Unary(_, operand) => expr_functions(operand, out),
        ExprKind::Binary(_, l, r) => {
            expr_functions(l, out);
            expr_functions(r, out);
        }
        ExprKind::Conditional { cond, then, otherwise } => {
            expr_functions(cond, out);
            expr_functions(then, out);
            expr_functions(otherwise, out);
        }
    }
}

pub(crate) fn template_functions(parts: &[TemplatePart], out: &mut Vec<(String, Span)>) {
    for part in parts {
        match part {
            TemplatePart::Literal(_) => {}
            TemplatePart::Interpolation(e) => expr_functions(e, out),
            TemplatePart::If { cond, then, otherwise } => {
                expr_functions(cond, out);
                template_functions(then, out);
                template_functions(otherwise, out);
            }
            TemplatePart::For { collection, body, .. } => {
                expr_functions(collection, out);
                template_functions(body, out);
            }
        }
    }
}
