// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! prepalert-expr: the expression and template language used by rules
//!
//! Values are dynamically typed and may be `Unknown`, which lets a
//! configuration be checked before any alert exists. Scopes are immutable;
//! binding returns a new child scope.

pub mod ast;
pub mod diagnostic;
mod eval;
pub mod functions;
pub mod lexer;
mod parser;
mod refs;
pub mod scope;
pub mod span;
mod template;
pub mod token;
pub mod value;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use eval::evaluate;
pub use functions::{FuncError, Function, SPECIAL_FORMS};
pub use refs::Traversal;
pub use scope::Scope;
pub use span::Span;
pub use template::{Expression, Template};
pub use value::{object, Object, Value};
