// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alert webhook payloads.
//!
//! The monitoring service posts camelCase JSON; the structs deserialize from
//! that shape and serialize back out in snake_case, which is the form the
//! expression environment exposes under `runtime.event`.

use serde::{Deserialize, Serialize};

/// A single webhook notification about an alert (or a host/service change).
///
/// Constructed once per incoming request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct AlertEvent {
    #[serde(default)]
    pub org_name: String,
    /// Event kind, e.g. `alert`, `alertGroup`, `hostStatus`
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub host: Option<Host>,
    #[serde(default)]
    pub service: Option<Service>,
    #[serde(default)]
    pub alert: Option<Alert>,
}

impl AlertEvent {
    /// Parse a webhook body.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Alert id, if this event carries an alert.
    pub fn alert_id(&self) -> Option<&str> {
        self.alert.as_ref().map(|a| a.id.as_str())
    }
}

/// Alert portion of the webhook payload.
///
/// `opened_at` and `closed_at` are Unix seconds; `created_at` is Unix
/// milliseconds. `closed_at` is `None` while the alert is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Alert {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub opened_at: i64,
    #[serde(default)]
    pub closed_at: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub monitor_name: String,
    #[serde(default)]
    pub monitor_operator: Option<String>,
    #[serde(default)]
    pub metric_label: Option<String>,
    #[serde(default)]
    pub metric_value: Option<f64>,
    #[serde(default)]
    pub warning_threshold: Option<f64>,
    #[serde(default)]
    pub critical_threshold: Option<f64>,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub url: String,
}

crate::builder! {
    pub struct AlertBuilder => Alert {
        id: String = "2bj6bp5ZDBa".into(),
        status: String = "critical".into(),
        is_open: bool = true,
        opened_at: i64 = 1_700_000_000,
        closed_at: Option<i64> = None,
        created_at: i64 = 1_700_000_000_000,
        duration: i64 = 5,
        monitor_name: String = "cpu usage".into(),
        monitor_operator: Option<String> = None,
        metric_label: Option<String> = None,
        metric_value: Option<f64> = None,
        warning_threshold: Option<f64> = None,
        critical_threshold: Option<f64> = None,
        trigger: String = "monitor".into(),
        url: String = "https://mackerel.io/orgs/example/alerts/2bj6bp5ZDBa".into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Host {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename(deserialize = "type"))]
    pub host_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub is_retired: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Role {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub service_url: String,
    #[serde(default)]
    pub role_name: String,
    #[serde(default)]
    pub role_url: String,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
