// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

/// Parse a duration such as `30s`, `15m`, `1h` or `1h30m`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for ch in s.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let unit = match ch {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            _ => return Err(format!("invalid duration unit '{ch}' in \"{s}\" (expected s, m or h)")),
        };
        let n: u64 = digits.parse().map_err(|_| format!("invalid duration \"{s}\""))?;
        total = n
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| format!("duration \"{s}\" is too large"))?;
        digits.clear();
    }
    if !digits.is_empty() {
        return Err(format!("duration \"{s}\" is missing a unit (s, m or h)"));
    }
    if total == 0 {
        return Err(format!("duration \"{s}\" must be positive"));
    }
    Ok(Duration::from_secs(total))
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
