// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod codec;
mod collection;
mod env;
mod math;
mod result;
mod string;
mod time;

use std::sync::Arc;

use prepalert_core::FakeClock;
use serde_json::Value as Json;

use crate::{Diagnostic, Expression, Scope};

/// Epoch seconds returned by `now()` in these tests (2023-11-14T22:13:20Z).
const NOW: i64 = 1_700_000_000;

fn scope() -> Scope {
    Scope::with_stdlib_clock(Arc::new(FakeClock::new(NOW)))
}

/// Evaluate `src` with the standard library and a fixed clock, as JSON.
fn call(src: &str) -> Json {
    Expression::parse(src)
        .unwrap()
        .evaluate(&scope())
        .unwrap_or_else(|e| panic!("{src}: {e}"))
        .to_json()
}

fn call_err(src: &str) -> Diagnostic {
    Expression::parse(src).unwrap().evaluate(&scope()).unwrap_err().first().cloned().unwrap()
}
