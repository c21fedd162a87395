// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{add, integer_arg, number_arg, primitive_string, string_arg, FuncError, Function, Registry};
use crate::value::Value;

pub(super) fn register(fns: &mut Registry) {
    add(fns, "abs", Function::fixed(1, |a| Ok(Value::from_f64(number_arg(a, 0)?.abs()))));
    add(fns, "ceil", Function::fixed(1, |a| Ok(Value::from_f64(number_arg(a, 0)?.ceil()))));
    add(fns, "floor", Function::fixed(1, |a| Ok(Value::from_f64(number_arg(a, 0)?.floor()))));
    add(fns, "max", Function::variadic(1, |a| fold(a, f64::max)));
    add(fns, "min", Function::variadic(1, |a| fold(a, f64::min)));
    add(
        fns,
        "pow",
        Function::fixed(2, |a| Ok(Value::from_f64(number_arg(a, 0)?.powf(number_arg(a, 1)?)))),
    );
    add(
        fns,
        "parseint",
        Function::fixed(2, |a| {
            let s = string_arg(a, 0)?;
            let base = integer_arg(a, 1)?;
            if !(2..=36).contains(&base) {
                return Err(FuncError::failed("base must be between 2 and 36"));
            }
            i64::from_str_radix(s, base as u32)
                .map(Value::from)
                .map_err(|_| FuncError::failed(format!("cannot parse \"{s}\" as a base {base} integer")))
        }),
    );
    add(
        fns,
        "tostring",
        Function::fixed(1, |a| match &a[0] {
            Value::Null => Ok(Value::Null),
            v => primitive_string(v)
                .map(Value::from)
                .ok_or(FuncError::Type { index: 0, expected: "string, number or bool", found: v.type_name() }),
        }),
    );
    add(
        fns,
        "tonumber",
        Function::fixed(1, |a| match &a[0] {
            Value::Null => Ok(Value::Null),
            Value::Number(_) => Ok(a[0].clone()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::from_f64)
                .map_err(|_| FuncError::failed(format!("cannot convert \"{s}\" to a number"))),
            v => Err(FuncError::Type { index: 0, expected: "string or number", found: v.type_name() }),
        }),
    );
}

fn fold(a: &[Value], f: fn(f64, f64) -> f64) -> Result<Value, FuncError> {
    let mut acc = number_arg(a, 0)?;
    for i in 1..a.len() {
        acc = f(acc, number_arg(a, i)?);
    }
    Ok(Value::from_f64(acc))
}
