// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured evaluation diagnostics.

use crate::span::{diagnostic_context, Span};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Syntax,
    TypeMismatch,
    UnknownFunction,
    UndefinedVariable,
    UnsupportedAttribute,
    InvalidIndex,
    Arity,
    /// A function ran and reported an error (e.g. `must_env`).
    Function,
}

prepalert_core::simple_display! {
    DiagnosticKind {
        Syntax => "syntax error",
        TypeMismatch => "type mismatch",
        UnknownFunction => "unknown function",
        UndefinedVariable => "unknown variable",
        UnsupportedAttribute => "unsupported attribute",
        InvalidIndex => "invalid index",
        Arity => "wrong number of arguments",
        Function => "function error",
    }
}

/// A single problem found while parsing or evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, detail: impl Into<String>, span: Span) -> Self {
        Self { kind, detail: detail.into(), span }
    }

    pub fn syntax(detail: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, detail, span)
    }

    pub fn type_mismatch(detail: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::TypeMismatch, detail, span)
    }

    /// Render with a line/column pointer into `source`.
    pub fn render(&self, source: &str) -> String {
        diagnostic_context(source, self.span, &self.to_string())
    }
}

/// One or more diagnostics from a single parse or evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new(items: Vec<Diagnostic>) -> Self {
        Self(items)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Diagnostic> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.0.iter().any(|d| d.kind == kind)
    }

    /// Render every diagnostic against `source`, separated by blank lines.
    pub fn render(&self, source: &str) -> String {
        self.0.iter().map(|d| d.render(source)).collect::<Vec<_>>().join("\n\n")
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(d: Diagnostic) -> Self {
        Self(vec![d])
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}
