// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory alert service for `exec --dry-run`

use std::collections::HashMap;
use std::fmt::Write as _;

use async_trait::async_trait;
use parking_lot::Mutex;
use prepalert_adapters::{AlertService, GraphAnnotation, MackerelError};

#[derive(Default)]
struct DryRunState {
    memos: HashMap<String, String>,
    annotations: Vec<GraphAnnotation>,
    memo_writes: usize,
}

/// Keeps writes in memory so they can be printed instead of sent.
#[derive(Default)]
pub struct DryRunAlertService {
    state: Mutex<DryRunState>,
}

impl DryRunAlertService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the memo carried by the webhook.
    pub fn seed_memo(&self, alert_id: &str, memo: &str) {
        self.state.lock().memos.insert(alert_id.to_string(), memo.to_string());
    }

    pub fn memo(&self, alert_id: &str) -> Option<String> {
        self.state.lock().memos.get(alert_id).cloned()
    }

    pub fn annotations(&self) -> Vec<GraphAnnotation> {
        self.state.lock().annotations.clone()
    }

    /// Final memo and annotations, with headings passed through `paint`.
    pub fn report(&self, alert_id: &str, paint: fn(&str) -> String) -> String {
        let state = self.state.lock();
        let mut out = String::new();
        if state.memo_writes > 0 {
            let _ = writeln!(out, "{}", paint(&format!("memo of alert {alert_id} ({} writes)", state.memo_writes)));
            let _ = writeln!(out, "{}", state.memos.get(alert_id).map(String::as_str).unwrap_or_default());
        }
        for annotation in &state.annotations {
            if !out.is_empty() {
                out.push('\n');
            }
            let heading = format!(
                "graph annotation on {} [{}..{}] {}",
                annotation.service, annotation.from, annotation.to, annotation.title
            );
            let _ = writeln!(out, "{}", paint(&heading));
            let _ = writeln!(out, "{}", annotation.description);
        }
        if out.is_empty() {
            out.push_str("nothing written\n");
        }
        out
    }
}

#[async_trait]
impl AlertService for DryRunAlertService {
    async fn get_alert_memo(&self, alert_id: &str) -> Result<String, MackerelError> {
        Ok(self.state.lock().memos.get(alert_id).cloned().unwrap_or_default())
    }

    async fn update_alert_memo(&self, alert_id: &str, memo: &str) -> Result<(), MackerelError> {
        let mut state = self.state.lock();
        state.memos.insert(alert_id.to_string(), memo.to_string());
        state.memo_writes += 1;
        Ok(())
    }

    async fn find_graph_annotations(
        &self,
        service: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<GraphAnnotation>, MackerelError> {
        let state = self.state.lock();
        Ok(state
            .annotations
            .iter()
            .filter(|a| a.service == service && a.from <= to && a.to >= from)
            .cloned()
            .collect())
    }

    async fn create_graph_annotation(&self, annotation: &GraphAnnotation) -> Result<GraphAnnotation, MackerelError> {
        let mut state = self.state.lock();
        let mut created = annotation.clone();
        created.id = Some(format!("dry-run-{}", state.annotations.len() + 1));
        state.annotations.push(created.clone());
        Ok(created)
    }

    async fn update_graph_annotation(
        &self,
        id: &str,
        annotation: &GraphAnnotation,
    ) -> Result<GraphAnnotation, MackerelError> {
        let mut state = self.state.lock();
        let mut updated = annotation.clone();
        updated.id = Some(id.to_string());
        match state.annotations.iter_mut().find(|a| a.id.as_deref() == Some(id)) {
            Some(slot) => *slot = updated.clone(),
            None => state.annotations.push(updated.clone()),
        }
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "dry_run_tests.rs"]
mod tests;
