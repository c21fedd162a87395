// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tree-walking evaluator.
//!
//! Evaluation stops at the first diagnostic. Unknown operands short-circuit
//! to `Unknown` before any type check, so validating a template against a
//! scope full of unknowns only reports problems that hold for every input.

use crate::ast::{BinaryOp, Expr, ExprKind, ObjectKey, TemplatePart, UnaryOp};
use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::scope::{func_diagnostic, Scope};
use crate::span::Span;
use crate::value::{format_number, Object, Value};

/// Evaluate `expr` against `scope`.
pub fn evaluate(scope: &Scope, expr: &Expr) -> Result<Value, Diagnostics> {
    eval(scope, expr).map_err(Diagnostics::from)
}

pub(crate) fn eval(scope: &Scope, expr: &Expr) -> Result<Value, Diagnostic> {
    match &expr.kind {
        ExprKind::Literal(v) => Ok(v.clone()),
        ExprKind::Template(parts) => {
            // A string that is exactly one interpolation yields the raw value
            if let [TemplatePart::Interpolation(inner)] = parts.as_slice() {
                return eval(scope, inner);
            }
            render_parts(scope, parts)
        }
        ExprKind::Variable(name) => scope.lookup(name).cloned().ok_or_else(|| {
            Diagnostic::new(
                DiagnosticKind::UndefinedVariable,
                format!("there is no variable named \"{name}\""),
                expr.span,
            )
        }),
        ExprKind::GetAttr(target, name) => {
            let target = eval(scope, target)?;
            get_attr(target, name, expr.span)
        }
        ExprKind::Index(target, index) => {
            let target = eval(scope, target)?;
            let key = eval(scope, index)?;
            get_index(target, key, index.span)
        }
        ExprKind::List(items) => items.iter().map(|e| eval(scope, e)).collect::<Result<Vec<_>, _>>().map(Value::List),
        ExprKind::Object(entries) => eval_object(scope, entries),
        ExprKind::Call { name, args } => eval_call(scope, name, args, expr.span),
        ExprKind::Unary(op, operand) => {
            let v = eval(scope, operand)?;
            eval_unary(*op, v, operand.span)
        }
        ExprKind::Binary(op, left, right) => eval_binary(scope, *op, left, right),
        ExprKind::Conditional { cond, then, otherwise } => match eval(scope, cond)? {
            Value::Unknown => Ok(Value::Unknown),
            Value::Bool(true) => eval(scope, then),
            Value::Bool(false) => eval(scope, otherwise),
            other => Err(Diagnostic::type_mismatch(
                format!("condition must be bool, got {}", other.type_name()),
                cond.span,
            )),
        },
    }
}

fn get_attr(target: Value, name: &str, span: Span) -> Result<Value, Diagnostic> {
    match target {
        Value::Unknown => Ok(Value::Unknown),
        Value::Object(mut map) => map.shift_remove(name).ok_or_else(|| {
            Diagnostic::new(
                DiagnosticKind::UnsupportedAttribute,
                format!("this object does not have an attribute named \"{name}\""),
                span,
            )
        }),
        Value::Null => Err(Diagnostic::new(
            DiagnosticKind::UnsupportedAttribute,
            format!("attempt to get attribute \"{name}\" from a null value"),
            span,
        )),
        other => Err(Diagnostic::new(
            DiagnosticKind::UnsupportedAttribute,
            format!("cannot access attribute \"{name}\" on a {}", other.type_name()),
            span,
        )),
    }
}

fn get_index(target: Value, key: Value, span: Span) -> Result<Value, Diagnostic> {
    match (target, key) {
        (Value::Unknown, _) | (_, Value::Unknown) => Ok(Value::Unknown),
        (Value::List(mut items), key) => {
            let idx = key
                .as_f64()
                .filter(|n| n.fract() == 0.0 && *n >= 0.0)
                .ok_or_else(|| Diagnostic::new(DiagnosticKind::InvalidIndex, "list index must be a whole number", span))?;
            let len = items.len();
            let idx = idx as usize;
            if idx >= len {
                return Err(Diagnostic::new(
                    DiagnosticKind::InvalidIndex,
                    format!("index {idx} out of range for list of length {len}"),
                    span,
                ));
            }
            Ok(items.swap_remove(idx))
        }
        (Value::Object(mut map), Value::String(k)) => map.shift_remove(&k).ok_or_else(|| {
            Diagnostic::new(DiagnosticKind::InvalidIndex, format!("the given key \"{k}\" does not exist"), span)
        }),
        (target, key) => Err(Diagnostic::new(
            DiagnosticKind::InvalidIndex,
            format!("cannot index a {} with a {}", target.type_name(), key.type_name()),
            span,
        )),
    }
}

fn eval_object(scope: &Scope, entries: &[(ObjectKey, Expr)]) -> Result<Value, Diagnostic> {
    let mut map = Object::with_capacity(entries.len());
    let mut unknown_key = false;
    for (key, value) in entries {
        let key = match key {
            ObjectKey::Name(name) => name.clone(),
            ObjectKey::Expr(e) => match eval(scope, e)? {
                Value::Unknown => {
                    unknown_key = true;
                    continue;
                }
                other => crate::functions::primitive_string(&other).ok_or_else(|| {
                    Diagnostic::type_mismatch(format!("object key must be a string, got {}", other.type_name()), e.span)
                })?,
            },
        };
        map.insert(key, eval(scope, value)?);
    }
    if unknown_key {
        return Ok(Value::Unknown);
    }
    Ok(Value::Object(map))
}

fn eval_call(scope: &Scope, name: &str, args: &[Expr], span: Span) -> Result<Value, Diagnostic> {
    match name {
        "try" => return eval_try(scope, args, span),
        "can" => return eval_can(scope, args, span),
        _ => {}
    }
    let function = scope.function(name).ok_or_else(|| {
        Diagnostic::new(DiagnosticKind::UnknownFunction, format!("there is no function named \"{name}\""), span)
    })?;
    let values = args.iter().map(|a| eval(scope, a)).collect::<Result<Vec<_>, _>>()?;
    let arg_spans: Vec<Span> = args.iter().map(|a| a.span).collect();
    function.call(&values).map_err(|e| func_diagnostic(name, e, span, &arg_spans))
}

/// `try(a, b, ...)`: the first argument that evaluates without error.
fn eval_try(scope: &Scope, args: &[Expr], span: Span) -> Result<Value, Diagnostic> {
    if args.is_empty() {
        return Err(Diagnostic::new(DiagnosticKind::Arity, "function \"try\" expects at least 1 argument(s), got 0", span));
    }
    let mut last = None;
    for arg in args {
        match eval(scope, arg) {
            Ok(v) if v.is_wholly_known() => return Ok(v),
            Ok(_) => return Ok(Value::Unknown),
            Err(e) => last = Some(e),
        }
    }
    let detail = last.map(|e| e.detail).unwrap_or_default();
    Err(Diagnostic::new(
        DiagnosticKind::Function,
        format!("no expression given to \"try\" succeeded; last error: {detail}"),
        span,
    ))
}

/// `can(expr)`: whether `expr` evaluates without error.
fn eval_can(scope: &Scope, args: &[Expr], span: Span) -> Result<Value, Diagnostic> {
    let [arg] = args else {
        return Err(Diagnostic::new(
            DiagnosticKind::Arity,
            format!("function \"can\" expects 1 argument(s), got {}", args.len()),
            span,
        ));
    };
    match eval(scope, arg) {
        Ok(v) if v.is_wholly_known() => Ok(Value::Bool(true)),
        Ok(_) => Ok(Value::Unknown),
        Err(_) => Ok(Value::Bool(false)),
    }
}

fn eval_unary(op: UnaryOp, v: Value, span: Span) -> Result<Value, Diagnostic> {
    match (op, v) {
        (_, Value::Unknown) => Ok(Value::Unknown),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Number(n)) => Ok(n.as_f64().map(|f| Value::from_f64(-f)).unwrap_or(Value::Null)),
        (UnaryOp::Not, other) => Err(Diagnostic::type_mismatch(format!("'!' requires bool, got {}", other.type_name()), span)),
        (UnaryOp::Neg, other) => {
            Err(Diagnostic::type_mismatch(format!("'-' requires number, got {}", other.type_name()), span))
        }
    }
}

fn bool_operand(v: &Value, op: BinaryOp, span: Span) -> Result<Option<bool>, Diagnostic> {
    match v {
        Value::Unknown => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        other => Err(Diagnostic::type_mismatch(format!("'{op}' requires bool, got {}", other.type_name()), span)),
    }
}

fn eval_binary(scope: &Scope, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, Diagnostic> {
    // Logical operators short-circuit on a known left operand
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let l = bool_operand(&eval(scope, left)?, op, left.span)?;
        match (op, l) {
            (BinaryOp::And, Some(false)) => return Ok(Value::Bool(false)),
            (BinaryOp::Or, Some(true)) => return Ok(Value::Bool(true)),
            _ => {}
        }
        let r = bool_operand(&eval(scope, right)?, op, right.span)?;
        return Ok(match (l, r) {
            (Some(_), Some(r)) => Value::Bool(r),
            // Unknown on one side is still decided by a dominant value on the other
            (None, Some(false)) if op == BinaryOp::And => Value::Bool(false),
            (None, Some(true)) if op == BinaryOp::Or => Value::Bool(true),
            _ => Value::Unknown,
        });
    }

    let l = eval(scope, left)?;
    let r = eval(scope, right)?;
    match op {
        BinaryOp::Eq => return Ok(l.equals(&r).map(Value::Bool).unwrap_or(Value::Unknown)),
        BinaryOp::NotEq => return Ok(l.equals(&r).map(|eq| Value::Bool(!eq)).unwrap_or(Value::Unknown)),
        _ => {}
    }
    if l.is_unknown() || r.is_unknown() {
        return Ok(Value::Unknown);
    }
    let a = number_operand(&l, op, left.span)?;
    let b = number_operand(&r, op, right.span)?;
    let span = left.span.merge(right.span);
    Ok(match op {
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Le => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Ge => Value::Bool(a >= b),
        BinaryOp::Add => Value::from_f64(a + b),
        BinaryOp::Sub => Value::from_f64(a - b),
        BinaryOp::Mul => Value::from_f64(a * b),
        BinaryOp::Div | BinaryOp::Mod if b == 0.0 => {
            return Err(Diagnostic::new(DiagnosticKind::Function, "division by zero", span))
        }
        BinaryOp::Div => Value::from_f64(a / b),
        BinaryOp::Mod => Value::from_f64(a % b),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Eq | BinaryOp::NotEq => Value::Unknown,
    })
}

fn number_operand(v: &Value, op: BinaryOp, span: Span) -> Result<f64, Diagnostic> {
    v.as_f64().ok_or_else(|| {
        Diagnostic::type_mismatch(format!("'{op}' requires number, got {}", v.type_name()), span)
    })
}

/// Render template parts to a string value, or `Unknown` if any
/// interpolated value is unknown.
pub(crate) fn render_parts(scope: &Scope, parts: &[TemplatePart]) -> Result<Value, Diagnostic> {
    let mut out = String::new();
    match render_into(scope, parts, &mut out)? {
        true => Ok(Value::String(out)),
        false => Ok(Value::Unknown),
    }
}

/// Returns false when rendering hit an unknown value.
fn render_into(scope: &Scope, parts: &[TemplatePart], out: &mut String) -> Result<bool, Diagnostic> {
    for part in parts {
        match part {
            TemplatePart::Literal(s) => out.push_str(s),
            TemplatePart::Interpolation(expr) => match eval(scope, expr)? {
                Value::Unknown => return Ok(false),
                Value::Null => {}
                Value::String(s) => out.push_str(&s),
                Value::Number(n) => out.push_str(&format_number(&n)),
                Value::Bool(b) => out.push_str(if b { "true" } else { "false" }),
                other => {
                    return Err(Diagnostic::type_mismatch(
                        format!("cannot include a {} in a string template", other.type_name()),
                        expr.span,
                    ))
                }
            },
            TemplatePart::If { cond, then, otherwise } => {
                let branch = match eval(scope, cond)? {
                    Value::Unknown => return Ok(false),
                    Value::Bool(true) => then,
                    Value::Bool(false) => otherwise,
                    other => {
                        return Err(Diagnostic::type_mismatch(
                            format!("if condition must be bool, got {}", other.type_name()),
                            cond.span,
                        ))
                    }
                };
                if !render_into(scope, branch, out)? {
                    return Ok(false);
                }
            }
            TemplatePart::For { key, value, collection, body } => {
                let entries: Vec<(Value, Value)> = match eval(scope, collection)? {
                    Value::Unknown => return Ok(false),
                    Value::List(items) => {
                        items.into_iter().enumerate().map(|(i, v)| (Value::from(i as i64), v)).collect()
                    }
                    Value::Object(map) => map.into_iter().map(|(k, v)| (Value::String(k), v)).collect(),
                    other => {
                        return Err(Diagnostic::type_mismatch(
                            format!("for loop requires a list or object, got {}", other.type_name()),
                            collection.span,
                        ))
                    }
                };
                for (k, v) in entries {
                    let mut inner = scope.with_variable(value.clone(), v);
                    if let Some(key) = key {
                        inner = inner.with_variable(key.clone(), k);
                    }
                    if !render_into(&inner, body, out)? {
                        return Ok(false);
                    }
                }
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;
