// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{add, integer_arg, list_arg, number_arg, object_arg, string_arg, FuncError, Function, Registry};
use crate::value::Value;

pub(super) fn register(fns: &mut Registry) {
    add(
        fns,
        "length",
        Function::fixed(1, |a| match &a[0] {
            Value::String(s) => Ok(Value::from(s.chars().count() as i64)),
            Value::List(items) => Ok(Value::from(items.len() as i64)),
            Value::Object(map) => Ok(Value::from(map.len() as i64)),
            other => Err(FuncError::Type { index: 0, expected: "string, list or object", found: other.type_name() }),
        }),
    );
    add(
        fns,
        "concat",
        Function::variadic(1, |a| {
            let mut out = Vec::new();
            for i in 0..a.len() {
                out.extend_from_slice(list_arg(a, i)?);
            }
            Ok(Value::List(out))
        }),
    );
    add(
        fns,
        "keys",
        Function::fixed(1, |a| {
            let mut keys: Vec<&String> = object_arg(a, 0)?.keys().collect();
            keys.sort();
            Ok(Value::List(keys.into_iter().map(|k| Value::from(k.as_str())).collect()))
        }),
    );
    add(
        fns,
        "values",
        Function::fixed(1, |a| {
            let map = object_arg(a, 0)?;
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|x, y| x.0.cmp(y.0));
            Ok(Value::List(entries.into_iter().map(|(_, v)| v.clone()).collect()))
        }),
    );
    add(
        fns,
        "lookup",
        Function::new(2, Some(3), |a| {
            let map = object_arg(a, 0)?;
            let key = string_arg(a, 1)?;
            match (map.get(key), a.get(2)) {
                (Some(v), _) => Ok(v.clone()),
                (None, Some(default)) => Ok(default.clone()),
                (None, None) => Err(FuncError::failed(format!("the given object has no attribute \"{key}\""))),
            }
        }),
    );
    add(
        fns,
        "element",
        Function::fixed(2, |a| {
            let items = list_arg(a, 0)?;
            if items.is_empty() {
                return Err(FuncError::failed("cannot use element function with an empty list"));
            }
            let idx = integer_arg(a, 1)?;
            if idx < 0 {
                return Err(FuncError::failed("cannot use element function with a negative index"));
            }
            Ok(items[(idx as usize) % items.len()].clone())
        }),
    );
    add(
        fns,
        "flatten",
        Function::fixed(1, |a| {
            let mut out = Vec::new();
            flatten_into(list_arg(a, 0)?, &mut out);
            Ok(Value::List(out))
        }),
    );
    add(
        fns,
        "distinct",
        Function::fixed(1, |a| {
            let mut out: Vec<Value> = Vec::new();
            for item in list_arg(a, 0)? {
                if !out.contains(item) {
                    out.push(item.clone());
                }
            }
            Ok(Value::List(out))
        }),
    );
    add(
        fns,
        "reverse",
        Function::fixed(1, |a| Ok(Value::List(list_arg(a, 0)?.iter().rev().cloned().collect()))),
    );
    add(fns, "sort", Function::fixed(1, sort));
    add(fns, "range", Function::new(1, Some(3), range));
    add(
        fns,
        "coalesce",
        Function::variadic(1, |a| {
            Ok(a.iter()
                .find(|v| !v.is_null() && v.as_str() != Some(""))
                .cloned()
                .unwrap_or(Value::Null))
        }),
    );
}

fn flatten_into(items: &[Value], out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::List(inner) => flatten_into(inner, out),
            other => out.push(other.clone()),
        }
    }
}

/// Strings sort lexicographically and numbers by value; mixing is an error.
fn sort(a: &[Value]) -> Result<Value, FuncError> {
    let items = list_arg(a, 0)?;
    if items.iter().all(|v| v.as_str().is_some()) {
        let mut out: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
        out.sort_unstable();
        return Ok(Value::List(out.into_iter().map(Value::from).collect()));
    }
    if items.iter().all(|v| v.as_f64().is_some()) {
        let mut out: Vec<f64> = items.iter().filter_map(Value::as_f64).collect();
        out.sort_by(f64::total_cmp);
        return Ok(Value::List(out.into_iter().map(Value::from_f64).collect()));
    }
    Err(FuncError::failed("sort requires a list of strings or a list of numbers"))
}

const MAX_RANGE: usize = 1024 * 1024;

/// `range(limit)`, `range(start, limit)` or `range(start, limit, step)`.
fn range(a: &[Value]) -> Result<Value, FuncError> {
    let (start, limit) = match a.len() {
        1 => (0.0, number_arg(a, 0)?),
        _ => (number_arg(a, 0)?, number_arg(a, 1)?),
    };
    let step = match a.get(2) {
        Some(_) => number_arg(a, 2)?,
        None if limit < start => -1.0,
        None => 1.0,
    };
    if step == 0.0 {
        return Err(FuncError::failed("step must not be zero"));
    }
    let mut out = Vec::new();
    let mut n = start;
    while (step > 0.0 && n < limit) || (step < 0.0 && n > limit) {
        if out.len() >= MAX_RANGE {
            return Err(FuncError::failed("range too large"));
        }
        out.push(Value::from_f64(n));
        n += step;
    }
    Ok(Value::List(out))
}
