// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Alert, AlertEvent, Cell, QueryResult};

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use proptest::prelude::*;

    /// Free-form memo text, occasionally containing markdown headers.
    pub fn arb_memo() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                "[a-z ]{0,12}".prop_map(|s| s),
                Just("\n## Other\n".to_string()),
                Just("\n\n".to_string()),
                Just("# Top\n".to_string()),
            ],
            0..8,
        )
        .prop_map(|parts| parts.concat())
    }
}

// ── Event factory functions ─────────────────────────────────────────────

/// Event for an open alert raised by `monitor`.
pub fn open_alert_event(alert_id: &str, monitor: &str) -> AlertEvent {
    event_with(Alert::builder().id(alert_id).monitor_name(monitor).build())
}

/// Event for an alert raised by `monitor` that closed at `closed_at`.
pub fn closed_alert_event(alert_id: &str, monitor: &str, closed_at: i64) -> AlertEvent {
    event_with(
        Alert::builder()
            .id(alert_id)
            .monitor_name(monitor)
            .is_open(false)
            .status("ok")
            .closed_at(closed_at)
            .build(),
    )
}

pub fn event_with(alert: Alert) -> AlertEvent {
    AlertEvent {
        org_name: "Example-Org".to_string(),
        event: "alert".to_string(),
        memo: String::new(),
        image_url: None,
        host: None,
        service: None,
        alert: Some(alert),
    }
}

/// Result whose cells are all JSON strings.
pub fn simple_result(name: &str, columns: &[&str], rows: &[&[&str]]) -> QueryResult {
    QueryResult::new(
        name,
        format!("SELECT {}", columns.join(", ")),
        vec![],
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter().map(|r| r.iter().map(|c| Cell::from(*c)).collect()).collect(),
    )
}
