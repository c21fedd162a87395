// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use prepalert_core::Clock;

use super::{add, number_arg, string_arg, FuncError, Function, Registry};
use crate::value::Value;

pub(super) fn register(fns: &mut Registry, clock: Arc<dyn Clock>) {
    add(
        fns,
        "strftime",
        Function::fixed(2, |a| {
            let t = timestamp(number_arg(a, 1)?)?;
            format_time(string_arg(a, 0)?, &t)
        }),
    );
    add(
        fns,
        "strftime_in_zone",
        Function::fixed(3, |a| {
            let fmt = string_arg(a, 0)?;
            let t = timestamp(number_arg(a, 2)?)?;
            match parse_zone(string_arg(a, 1)?)? {
                Zone::Local => format_time(fmt, &t.with_timezone(&Local)),
                Zone::Fixed(offset) => format_time(fmt, &t.with_timezone(&offset)),
            }
        }),
    );
    add(fns, "now", Function::fixed(0, move |_| Ok(Value::from(clock.epoch_secs()))));
}

enum Zone {
    Local,
    Fixed(FixedOffset),
}

/// `UTC`, `Local`, or a fixed offset written `+09:00` / `-0530`.
fn parse_zone(name: &str) -> Result<Zone, FuncError> {
    let unsupported = || FuncError::failed(format!("unsupported time zone \"{name}\""));
    match name {
        "UTC" | "Z" | "utc" => return Ok(Zone::Fixed(FixedOffset::east_opt(0).ok_or_else(unsupported)?)),
        "Local" | "local" => return Ok(Zone::Local),
        _ => {}
    }
    let (sign, rest) = match name.as_bytes().first() {
        Some(b'+') => (1, &name[1..]),
        Some(b'-') => (-1, &name[1..]),
        _ => return Err(unsupported()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(unsupported());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| unsupported())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| unsupported())?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(Zone::Fixed).ok_or_else(unsupported)
}

fn timestamp(unix: f64) -> Result<DateTime<Utc>, FuncError> {
    let secs = unix.floor();
    let nanos = ((unix - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
        .ok_or_else(|| FuncError::failed(format!("timestamp {unix} out of range")))
}

fn format_time<Tz: TimeZone>(fmt: &str, t: &DateTime<Tz>) -> Result<Value, FuncError>
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", t.format(fmt)).map_err(|_| FuncError::failed(format!("invalid time format \"{fmt}\"")))?;
    Ok(out.into())
}
