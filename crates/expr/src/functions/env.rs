// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{add, string_arg, FuncError, Function, Registry};
use crate::value::Value;

pub(super) fn register(fns: &mut Registry) {
    add(
        fns,
        "env",
        Function::new(1, Some(2), |a| {
            let name = string_arg(a, 0)?;
            match std::env::var(name) {
                Ok(v) => Ok(v.into()),
                Err(_) => Ok(a.get(1).cloned().unwrap_or_else(|| Value::from(""))),
            }
        }),
    );
    add(
        fns,
        "must_env",
        Function::fixed(1, |a| {
            let name = string_arg(a, 0)?;
            std::env::var(name)
                .map(Value::from)
                .map_err(|_| FuncError::failed(format!("environment variable {name} is not set")))
        }),
    );
}
