// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `result_to_*` renderers over query objects.
//!
//! Each accepts either a query object (`query.<type>.<name>`) or its
//! `result` attribute. Objects that carry a `status` render a placeholder
//! until the query succeeds.

use prepalert_core::QueryResult;

use super::{add, FuncError, Function, Registry};
use crate::value::Value;

pub(super) fn register(fns: &mut Registry) {
    add(fns, "result_to_table", renderer(QueryResult::to_table));
    add(fns, "result_to_markdown", renderer(QueryResult::to_markdown_table));
    add(fns, "result_to_jsonlines", renderer(QueryResult::to_jsonlines));
    add(fns, "result_to_vertical", renderer(QueryResult::to_vertical));
    add(fns, "result_to_borderless", renderer(QueryResult::to_borderless_table));
}

fn renderer(render: fn(&QueryResult) -> String) -> Function {
    Function::fixed(1, move |a| render_value(&a[0], render))
}

fn render_value(value: &Value, render: fn(&QueryResult) -> String) -> Result<Value, FuncError> {
    let map = match value {
        Value::Null => return Ok(Value::from("")),
        Value::Object(map) => map,
        other => return Err(FuncError::Type { index: 0, expected: "query object", found: other.type_name() }),
    };

    if let Some(status) = map.get("status").and_then(Value::as_str) {
        let fqn = map.get("fqn").and_then(Value::as_str).unwrap_or_default();
        return match status {
            "running" => Ok(format!("[query \"{fqn}\" running]").into()),
            "failed" => {
                let msg = map.get("error").and_then(Value::as_str).unwrap_or("unknown error");
                Ok(format!("[query \"{fqn}\" failed: {msg}]").into())
            }
            "success" => match map.get("result") {
                Some(result) => render_value(result, render),
                None => Err(FuncError::failed(format!("query \"{fqn}\" has no result"))),
            },
            other => Err(FuncError::failed(format!("unexpected query status \"{other}\""))),
        };
    }

    let result: QueryResult = serde_json::from_value(value.to_json())
        .map_err(|e| FuncError::failed(format!("not a query result: {e}")))?;
    Ok(render(&result).into())
}
