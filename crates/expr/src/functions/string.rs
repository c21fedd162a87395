// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use regex::Regex;

use super::{add, list_arg, primitive_string, string_arg, Function, FuncError, Registry};
use crate::value::Value;

pub(super) fn register(fns: &mut Registry) {
    add(fns, "upper", Function::fixed(1, |a| Ok(string_arg(a, 0)?.to_uppercase().into())));
    add(fns, "lower", Function::fixed(1, |a| Ok(string_arg(a, 0)?.to_lowercase().into())));
    add(fns, "trimspace", Function::fixed(1, |a| Ok(string_arg(a, 0)?.trim().into())));
    add(
        fns,
        "trim",
        Function::fixed(2, |a| {
            let cutset: Vec<char> = string_arg(a, 1)?.chars().collect();
            Ok(string_arg(a, 0)?.trim_matches(cutset.as_slice()).into())
        }),
    );
    add(
        fns,
        "trimprefix",
        Function::fixed(2, |a| {
            let s = string_arg(a, 0)?;
            Ok(s.strip_prefix(string_arg(a, 1)?).unwrap_or(s).into())
        }),
    );
    add(
        fns,
        "trimsuffix",
        Function::fixed(2, |a| {
            let s = string_arg(a, 0)?;
            Ok(s.strip_suffix(string_arg(a, 1)?).unwrap_or(s).into())
        }),
    );
    add(fns, "replace", Function::fixed(3, replace));
    add(
        fns,
        "split",
        Function::fixed(2, |a| {
            let sep = string_arg(a, 0)?;
            let s = string_arg(a, 1)?;
            if s.is_empty() {
                return Ok(Value::List(vec![]));
            }
            Ok(Value::List(s.split(sep).map(Value::from).collect()))
        }),
    );
    add(
        fns,
        "join",
        Function::fixed(2, |a| {
            let sep = string_arg(a, 0)?;
            let parts = list_arg(a, 1)?
                .iter()
                .map(|v| {
                    primitive_string(v)
                        .ok_or_else(|| FuncError::failed(format!("cannot join a {}", v.type_name())))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(sep).into())
        }),
    );
    add(fns, "substr", Function::fixed(3, substr));
    add(fns, "strlen", Function::fixed(1, |a| Ok(Value::from(string_arg(a, 0)?.chars().count() as i64))));
    add(fns, "format", Function::variadic(1, format));
    add(fns, "title", Function::fixed(1, |a| Ok(title(string_arg(a, 0)?).into())));
    add(
        fns,
        "startswith",
        Function::fixed(2, |a| Ok(string_arg(a, 0)?.starts_with(string_arg(a, 1)?).into())),
    );
    add(
        fns,
        "endswith",
        Function::fixed(2, |a| Ok(string_arg(a, 0)?.ends_with(string_arg(a, 1)?).into())),
    );
    add(
        fns,
        "contains",
        Function::fixed(2, |a| match &a[0] {
            Value::String(s) => Ok(s.contains(string_arg(a, 1)?).into()),
            Value::List(items) => Ok(items.contains(&a[1]).into()),
            other => Err(FuncError::Type { index: 0, expected: "string or list", found: other.type_name() }),
        }),
    );
}

/// `replace(s, substr, replacement)`. A `substr` wrapped in slashes is a
/// regular expression.
fn replace(a: &[Value]) -> Result<Value, FuncError> {
    let s = string_arg(a, 0)?;
    let pattern = string_arg(a, 1)?;
    let replacement = string_arg(a, 2)?;
    if pattern.len() > 1 && pattern.starts_with('/') && pattern.ends_with('/') {
        let re = Regex::new(&pattern[1..pattern.len() - 1])
            .map_err(|e| FuncError::failed(format!("invalid regular expression: {e}")))?;
        return Ok(re.replace_all(s, replacement).into_owned().into());
    }
    Ok(s.replace(pattern, replacement).into())
}

/// `substr(s, offset, length)` in characters. A negative offset counts from
/// the end; a length of -1 takes the rest.
fn substr(a: &[Value]) -> Result<Value, FuncError> {
    let chars: Vec<char> = string_arg(a, 0)?.chars().collect();
    let len = chars.len() as i64;
    let mut offset = super::integer_arg(a, 1)?;
    let length = super::integer_arg(a, 2)?;
    if offset < 0 {
        offset += len;
    }
    let start = offset.clamp(0, len);
    let end = if length < 0 { len } else { start.saturating_add(length).min(len) };
    Ok(chars[start as usize..end as usize].iter().collect::<String>().into())
}

fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !ch.is_alphanumeric();
    }
    out
}

/// `format(spec, args...)` supporting `%s %d %f %.Nf %t %q %v %%`.
fn format(a: &[Value]) -> Result<Value, FuncError> {
    let spec = string_arg(a, 0)?;
    let mut args = a[1..].iter();
    let mut out = String::with_capacity(spec.len());
    let mut chars = spec.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let mut precision = None;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut digits = String::new();
            while let Some(d) = chars.peek().filter(|c| c.is_ascii_digit()) {
                digits.push(*d);
                chars.next();
            }
            precision = digits.parse::<usize>().ok();
        }
        let Some(verb) = chars.next() else {
            return Err(FuncError::failed("format string ends with a bare %"));
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        let arg = args
            .next()
            .ok_or_else(|| FuncError::failed(format!("not enough arguments for %{verb}")))?;
        match verb {
            's' | 'v' => out.push_str(&primitive_string(arg).unwrap_or_else(|| arg.to_json().to_string())),
            'q' => out.push_str(&serde_json::Value::String(primitive_string(arg).unwrap_or_default()).to_string()),
            't' => match arg {
                Value::Bool(b) => out.push_str(&b.to_string()),
                _ => return Err(FuncError::failed("%t requires a bool")),
            },
            'd' => match arg.as_f64() {
                Some(n) => out.push_str(&format!("{}", n.trunc() as i64)),
                None => return Err(FuncError::failed("%d requires a number")),
            },
            'f' => match arg.as_f64() {
                Some(n) => out.push_str(&format!("{:.*}", precision.unwrap_or(6), n)),
                None => return Err(FuncError::failed("%f requires a number")),
            },
            other => return Err(FuncError::failed(format!("unsupported verb %{other}"))),
        }
    }
    if args.next().is_some() {
        return Err(FuncError::failed("too many arguments for format string"));
    }
    Ok(out.into())
}
