// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule selection

use prepalert_core::AlertEvent;

use crate::rule::{Predicate, Rule};

/// Whether `rule` applies to `event`.
///
/// `Any` always matches. Otherwise the alert's open/closed state must be
/// enabled on the rule and the monitor name must be equal.
pub fn matches(rule: &Rule, event: &AlertEvent) -> bool {
    let Predicate::MonitorName(monitor_name) = &rule.predicate else {
        return true;
    };
    let Some(alert) = &event.alert else {
        return false;
    };
    if alert.is_open && !rule.on_opened {
        return false;
    }
    if !alert.is_open && !rule.on_closed {
        return false;
    }
    alert.monitor_name == *monitor_name
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
