// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{add, string_arg, FuncError, Function, Registry};
use crate::value::Value;

pub(super) fn register(fns: &mut Registry) {
    add(
        fns,
        "jsonencode",
        Function::fixed(1, |a| {
            serde_json::to_string(&a[0].to_json()).map(Value::from).map_err(|e| FuncError::failed(e.to_string()))
        }),
    );
    add(
        fns,
        "jsondecode",
        Function::fixed(1, |a| {
            serde_json::from_str::<serde_json::Value>(string_arg(a, 0)?)
                .map(Value::from_json)
                .map_err(|e| FuncError::failed(format!("invalid JSON: {e}")))
        }),
    );
    add(
        fns,
        "yamlencode",
        Function::fixed(1, |a| {
            serde_yaml::to_string(&a[0].to_json()).map(Value::from).map_err(|e| FuncError::failed(e.to_string()))
        }),
    );
    add(
        fns,
        "yamldecode",
        Function::fixed(1, |a| {
            serde_yaml::from_str::<serde_json::Value>(string_arg(a, 0)?)
                .map(Value::from_json)
                .map_err(|e| FuncError::failed(format!("invalid YAML: {e}")))
        }),
    );
}
