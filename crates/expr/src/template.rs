// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsed templates and expressions.

use crate::ast::{Expr, TemplatePart};
use crate::diagnostic::Diagnostics;
use crate::eval::{eval, render_parts};
use crate::parser::Parser;
use crate::refs::{expr_functions, expr_traversals, template_functions, template_traversals, Traversal};
use crate::scope::Scope;
use crate::span::Span;
use crate::value::Value;

/// A text template with `${}` interpolations and `%{}` directives.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    parts: Vec<TemplatePart>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, Diagnostics> {
        let parts = Parser::parse_template(source)?;
        Ok(Self { source: source.to_string(), parts })
    }

    /// Render to a `String` value, or `Unknown` if anything interpolated is
    /// not yet known.
    pub fn render(&self, scope: &Scope) -> Result<Value, Diagnostics> {
        Ok(render_parts(scope, &self.parts)?)
    }

    /// Render and require a fully known string.
    pub fn render_string(&self, scope: &Scope) -> Result<Option<String>, Diagnostics> {
        Ok(match self.render(scope)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every static variable path the template reads.
    pub fn references(&self) -> Vec<Traversal> {
        let mut out = Vec::new();
        template_traversals(&self.parts, &mut out);
        out
    }

    /// Every function called, with the span of the call.
    pub fn functions(&self) -> Vec<(String, Span)> {
        let mut out = Vec::new();
        template_functions(&self.parts, &mut out);
        out
    }
}

/// A single standalone expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    expr: Expr,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, Diagnostics> {
        let expr = Parser::parse_expression(source)?;
        Ok(Self { source: source.to_string(), expr })
    }

    pub fn evaluate(&self, scope: &Scope) -> Result<Value, Diagnostics> {
        Ok(eval(scope, &self.expr)?)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn references(&self) -> Vec<Traversal> {
        let mut out = Vec::new();
        expr_traversals(&self.expr, &mut out);
        out
    }

    pub fn functions(&self) -> Vec<(String, Span)> {
        let mut out = Vec::new();
        expr_functions(&self.expr, &mut out);
        out
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
