// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in function library.

mod codec;
mod collection;
mod env;
mod math;
mod result;
mod string;
mod time;

use std::collections::HashMap;
use std::sync::Arc;

use prepalert_core::Clock;
use thiserror::Error;

use crate::value::{Object, Value};

/// Special forms evaluated lazily by the evaluator, never looked up in a scope.
pub const SPECIAL_FORMS: &[&str] = &["try", "can"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FuncError {
    #[error("expects {expected} argument(s), got {got}")]
    Arity { expected: String, got: usize },

    #[error("argument {}: {expected} required, got {found}", index + 1)]
    Type { index: usize, expected: &'static str, found: &'static str },

    #[error("{0}")]
    Failed(String),
}

impl FuncError {
    pub fn failed(msg: impl Into<String>) -> Self {
        FuncError::Failed(msg.into())
    }
}

type Handler = dyn Fn(&[Value]) -> Result<Value, FuncError> + Send + Sync;

/// A callable registered in a scope.
#[derive(Clone)]
pub struct Function {
    min_args: usize,
    max_args: Option<usize>,
    handler: Arc<Handler>,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

impl Function {
    pub fn new<F>(min_args: usize, max_args: Option<usize>, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FuncError> + Send + Sync + 'static,
    {
        Self { min_args, max_args, handler: Arc::new(handler) }
    }

    /// Exactly `n` arguments.
    pub fn fixed<F>(n: usize, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FuncError> + Send + Sync + 'static,
    {
        Self::new(n, Some(n), handler)
    }

    /// At least `min` arguments.
    pub fn variadic<F>(min: usize, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FuncError> + Send + Sync + 'static,
    {
        Self::new(min, None, handler)
    }

    fn arity_text(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        }
    }

    /// Check arity, then call. Any argument that is not wholly known makes
    /// the result unknown without running the handler.
    pub fn call(&self, args: &[Value]) -> Result<Value, FuncError> {
        let got = args.len();
        if got < self.min_args || self.max_args.is_some_and(|max| got > max) {
            return Err(FuncError::Arity { expected: self.arity_text(), got });
        }
        if !args.iter().all(Value::is_wholly_known) {
            return Ok(Value::Unknown);
        }
        (self.handler)(args)
    }
}

/// Every built-in function, keyed by name.
pub fn stdlib(clock: Arc<dyn Clock>) -> HashMap<String, Function> {
    let mut fns = HashMap::new();
    string::register(&mut fns);
    collection::register(&mut fns);
    math::register(&mut fns);
    time::register(&mut fns, clock);
    env::register(&mut fns);
    codec::register(&mut fns);
    result::register(&mut fns);
    fns
}

pub(crate) type Registry = HashMap<String, Function>;

pub(crate) fn add(fns: &mut Registry, name: &str, function: Function) {
    fns.insert(name.to_string(), function);
}

// ── Argument helpers ────────────────────────────────────────────────────

fn mismatch(args: &[Value], index: usize, expected: &'static str) -> FuncError {
    let found = args.get(index).map(Value::type_name).unwrap_or("nothing");
    FuncError::Type { index, expected, found }
}

pub(crate) fn string_arg(args: &[Value], index: usize) -> Result<&str, FuncError> {
    args.get(index).and_then(Value::as_str).ok_or_else(|| mismatch(args, index, "string"))
}

pub(crate) fn number_arg(args: &[Value], index: usize) -> Result<f64, FuncError> {
    args.get(index).and_then(Value::as_f64).ok_or_else(|| mismatch(args, index, "number"))
}

pub(crate) fn integer_arg(args: &[Value], index: usize) -> Result<i64, FuncError> {
    let n = number_arg(args, index)?;
    if n.fract() != 0.0 {
        return Err(FuncError::failed(format!("argument {}: whole number required", index + 1)));
    }
    Ok(n as i64)
}

pub(crate) fn list_arg(args: &[Value], index: usize) -> Result<&[Value], FuncError> {
    args.get(index).and_then(Value::as_list).ok_or_else(|| mismatch(args, index, "list"))
}

pub(crate) fn object_arg(args: &[Value], index: usize) -> Result<&Object, FuncError> {
    args.get(index).and_then(Value::as_object).ok_or_else(|| mismatch(args, index, "object"))
}

/// String form of a primitive for `tostring`, `join` and `format`.
pub(crate) fn primitive_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(crate::value::format_number(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../functions_tests/mod.rs"]
mod tests;
