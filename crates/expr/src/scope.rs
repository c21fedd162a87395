// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable, nested evaluation scopes.
//!
//! A [`Scope`] is a cheap handle to a frame that reads through to its
//! parent. Binding never mutates: it returns a child scope holding the new
//! value, so a snapshot handed to a renderer stays valid while other tasks
//! produce newer scopes.

use std::collections::HashMap;
use std::sync::Arc;

use prepalert_core::Clock;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::functions::{self, FuncError, Function};
use crate::span::Span;
use crate::value::{Object, Value};

#[derive(Default)]
struct Frame {
    parent: Option<Scope>,
    variables: HashMap<String, Value>,
    functions: HashMap<String, Function>,
}

#[derive(Clone, Default)]
pub struct Scope {
    frame: Arc<Frame>,
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.variable_names();
        names.sort();
        f.debug_struct("Scope").field("variables", &names).finish()
    }
}

impl Scope {
    /// An empty root scope with no variables and no functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// A root scope with the standard function library installed.
    pub fn with_stdlib() -> Self {
        Self::with_stdlib_clock(Arc::new(prepalert_core::SystemClock))
    }

    /// Like [`Scope::with_stdlib`], with `now()` reading from `clock`.
    pub fn with_stdlib_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            frame: Arc::new(Frame {
                parent: None,
                variables: HashMap::new(),
                functions: functions::stdlib(clock),
            }),
        }
    }

    /// A new empty scope that reads through to `self`.
    pub fn new_child(&self) -> Self {
        Self { frame: Arc::new(Frame { parent: Some(self.clone()), ..Frame::default() }) }
    }

    /// A child scope with `name` bound directly, shadowing any parent value.
    pub fn with_variable(&self, name: impl Into<String>, value: Value) -> Self {
        let mut variables = HashMap::with_capacity(1);
        variables.insert(name.into(), value);
        Self {
            frame: Arc::new(Frame {
                parent: Some(self.clone()),
                variables,
                functions: HashMap::new(),
            }),
        }
    }

    /// A child scope with an additional function.
    pub fn with_function(&self, name: impl Into<String>, function: Function) -> Self {
        let mut functions = HashMap::with_capacity(1);
        functions.insert(name.into(), function);
        Self {
            frame: Arc::new(Frame {
                parent: Some(self.clone()),
                variables: HashMap::new(),
                functions,
            }),
        }
    }

    /// A child scope with `value` bound at a dotted `path`.
    ///
    /// The root variable is copied from the inherited scope and the value is
    /// merged into it, so `bind("query.command.a", ..)` keeps any existing
    /// `query.command.b`. A non-object along the path is replaced.
    pub fn bind(&self, path: &str, value: Value) -> Self {
        let mut segments = path.split('.');
        let root = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();
        if rest.is_empty() {
            return self.with_variable(root, value);
        }
        let base = self.lookup(root).cloned().unwrap_or(Value::Null);
        self.with_variable(root, merge_at(base, &rest, value))
    }

    /// Look up a root variable, walking outward through parents.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut scope = self;
        loop {
            if let Some(v) = scope.frame.variables.get(name) {
                return Some(v);
            }
            scope = scope.frame.parent.as_ref()?;
        }
    }

    /// Look up a dotted path such as `query.command.errors.status`.
    pub fn lookup_path(&self, path: &str) -> Option<&Value> {
        let (root, rest) = match path.split_once('.') {
            Some((root, rest)) => (root, Some(rest)),
            None => (path, None),
        };
        let value = self.lookup(root)?;
        match rest {
            Some(rest) => value.get_path(rest),
            None => Some(value),
        }
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        let mut scope = self;
        loop {
            if let Some(f) = scope.frame.functions.get(name) {
                return Some(f);
            }
            scope = scope.frame.parent.as_ref()?;
        }
    }

    /// Invoke a registered function by name.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, Diagnostic> {
        let Some(function) = self.function(name) else {
            return Err(Diagnostic::new(
                DiagnosticKind::UnknownFunction,
                format!("there is no function named \"{name}\""),
                Span::default(),
            ));
        };
        function.call(args).map_err(|e| func_diagnostic(name, e, Span::default(), &[]))
    }

    /// Names of every visible root variable.
    pub fn variable_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut scope = Some(self);
        while let Some(s) = scope {
            for name in s.frame.variables.keys() {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            scope = s.frame.parent.as_ref();
        }
        names
    }
}

fn merge_at(base: Value, path: &[&str], value: Value) -> Value {
    let Some((head, tail)) = path.split_first() else {
        return value;
    };
    let mut map = match base {
        Value::Object(map) => map,
        _ => Object::new(),
    };
    let child = map.get_mut(*head).map(std::mem::take).unwrap_or_default();
    map.insert(head.to_string(), merge_at(child, tail, value));
    map.into()
}

/// Map a function error onto a diagnostic, pointing at the offending
/// argument when one is known.
pub(crate) fn func_diagnostic(name: &str, err: FuncError, call_span: Span, arg_spans: &[Span]) -> Diagnostic {
    match err {
        FuncError::Arity { expected, got } => Diagnostic::new(
            DiagnosticKind::Arity,
            format!("function \"{name}\" expects {expected} argument(s), got {got}"),
            call_span,
        ),
        FuncError::Type { index, expected, found } => Diagnostic::new(
            DiagnosticKind::TypeMismatch,
            format!("function \"{name}\" argument {}: {expected} required, got {found}", index + 1),
            arg_spans.get(index).copied().unwrap_or(call_span),
        ),
        FuncError::Failed(msg) => Diagnostic::new(
            DiagnosticKind::Function,
            format!("call to \"{name}\" failed: {msg}"),
            call_span,
        ),
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
