// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-event write-back of rendered sections
//!
//! Every matched rule of one event owns a section slot. Renders land in the
//! slots as they happen; each flush writes the union of the current slots
//! onto the alert memo and the graph annotations. Flushes are serialized so
//! one alert sees one read-modify-write at a time.

use std::borrow::Cow;
use std::sync::Arc;

use prepalert_adapters::{AlertService, Backend, BackendError, GraphAnnotation, MackerelError};
use prepalert_core::{truncate_with_ellipsis, Alert, AlertEvent, Clock};
use prepalert_expr::{Scope, Template};
use thiserror::Error;

use crate::context::QueryContext;
use crate::memo::{compose_body, merge_section, trim_memo, MAX_ANNOTATION_DESCRIPTION_SIZE};
use crate::rule::Rule;

/// Padding either side of the alert's lifetime when looking up annotations.
pub const ANNOTATION_WINDOW_PADDING: i64 = 15 * 60;

#[derive(Debug, Error)]
pub enum WritebackError {
    #[error("alert service: {0}")]
    Alert(#[from] MackerelError),
    #[error("backend: {0}")]
    Backend(#[from] BackendError),
    #[error("object key: {0}")]
    ObjectKey(String),
}

/// Title that identifies the annotation prepalert owns for an alert.
pub fn annotation_title(alert_id: &str) -> String {
    format!("prepalert alert_id={alert_id}")
}

/// Default object key for the full memo text.
pub fn default_object_key(alert_id: &str) -> String {
    format!("alerts/{alert_id}.md")
}

/// Where flushed text goes.
#[derive(Clone)]
pub struct WritebackDeps {
    pub alerts: Arc<dyn AlertService>,
    pub backend: Arc<dyn Backend>,
    pub clock: Arc<dyn Clock>,
    /// Object key template; [`default_object_key`] when unset.
    pub object_key: Option<Template>,
}

impl WritebackDeps {
    pub fn new(alerts: Arc<dyn AlertService>, backend: Arc<dyn Backend>, clock: Arc<dyn Clock>) -> Self {
        Self { alerts, backend, clock, object_key: None }
    }

    pub fn with_object_key(mut self, template: Template) -> Self {
        self.object_key = Some(template);
        self
    }
}

/// What one rule's section feeds into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpec {
    pub rule: String,
    pub update_memo: bool,
    pub memo_cap: Option<usize>,
    pub annotation_service: Option<String>,
    pub annotation_cap: Option<usize>,
}

impl SectionSpec {
    pub fn for_rule(rule: &Rule) -> Self {
        Self {
            rule: rule.name.clone(),
            update_memo: rule.update_alert_memo,
            memo_cap: rule.max_memo_size,
            annotation_service: if rule.post_graph_annotation { rule.service.clone() } else { None },
            annotation_cap: rule.max_annotation_description_size,
        }
    }
}

#[derive(Debug, Clone)]
struct Section {
    revision: u64,
    text: String,
}

/// Write-back coordinator for one event.
pub struct Writeback {
    deps: WritebackDeps,
    alert: Option<Alert>,
    /// Scope the object key template is rendered against.
    key_scope: Scope,
    specs: Vec<SectionSpec>,
    sections: parking_lot::Mutex<Vec<Option<Section>>>,
    flush_lock: tokio::sync::Mutex<()>,
}

impl Writeback {
    /// `specs` fixes the section order: rule configuration order.
    pub fn new(deps: WritebackDeps, event: &AlertEvent, key_scope: Scope, specs: Vec<SectionSpec>) -> Self {
        let sections = parking_lot::Mutex::new(vec![None; specs.len()]);
        Self {
            deps,
            alert: event.alert.clone(),
            key_scope,
            specs,
            sections,
            flush_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Record a render of `rule`'s section.
    ///
    /// Returns false when the slot already holds a newer revision or the
    /// rule has no slot.
    pub fn update(&self, rule: &str, revision: u64, text: String) -> bool {
        let Some(index) = self.specs.iter().position(|s| s.rule == rule) else {
            tracing::warn!(rule, "section update for a rule without a slot");
            return false;
        };
        let mut sections = self.sections.lock();
        let Some(slot) = sections.get_mut(index) else {
            return false;
        };
        if slot.as_ref().is_some_and(|s| s.revision > revision) {
            tracing::debug!(rule, revision, "ignoring stale section");
            return false;
        }
        *slot = Some(Section { revision, text });
        true
    }

    /// Current text of `rule`'s section.
    pub fn section(&self, rule: &str) -> Option<String> {
        let index = self.specs.iter().position(|s| s.rule == rule)?;
        self.sections.lock().get(index).cloned().flatten().map(|s| s.text)
    }

    /// Write the current sections to the memo and annotations.
    pub async fn flush(&self, ctx: &QueryContext) -> Result<(), WritebackError> {
        let _guard = self.flush_lock.lock().await;
        let Some(alert) = &self.alert else {
            tracing::warn!("event has no alert, skipping write-back");
            return Ok(());
        };
        if ctx.is_cancelled() {
            tracing::debug!(alert_id = %alert.id, "flushing after cancellation");
        }

        let rendered: Vec<(&SectionSpec, String)> = {
            let sections = self.sections.lock();
            self.specs
                .iter()
                .zip(sections.iter())
                .filter_map(|(spec, section)| section.as_ref().map(|s| (spec, s.text.clone())))
                .collect()
        };
        if rendered.is_empty() {
            return Ok(());
        }

        let memo_sections: Vec<(&SectionSpec, &str)> =
            rendered.iter().filter(|(spec, _)| spec.update_memo).map(|(spec, text)| (*spec, text.as_str())).collect();
        let memo_written = if memo_sections.is_empty() {
            false
        } else {
            self.write_memo(alert, &memo_sections).await?;
            true
        };

        let wants_memo = self.specs.iter().any(|s| s.update_memo);
        if wants_memo && !memo_written {
            return Ok(());
        }
        self.write_annotations(alert, &rendered).await
    }

    fn object_key(&self, alert_id: &str) -> Result<String, WritebackError> {
        let Some(template) = &self.deps.object_key else {
            return Ok(default_object_key(alert_id));
        };
        match template.render_string(&self.key_scope) {
            Ok(Some(key)) => Ok(key),
            Ok(None) => Err(WritebackError::ObjectKey("depends on unknown values".to_string())),
            Err(diags) => Err(WritebackError::ObjectKey(diags.render(template.source()))),
        }
    }

    async fn write_memo(&self, alert: &Alert, sections: &[(&SectionSpec, &str)]) -> Result<(), WritebackError> {
        let full_text = sections.iter().map(|(_, text)| *text).collect::<Vec<_>>().join("\n\n");
        let key = self.object_key(&alert.id)?;
        let outcome = self.deps.backend.upload(&key, &full_text).await?;

        let trimmed: Vec<Cow<'_, str>> = sections
            .iter()
            .map(|(spec, text)| match spec.memo_cap {
                Some(cap) => truncate_with_ellipsis(text, cap),
                None => Cow::Borrowed(*text),
            })
            .collect();
        let url = outcome.uploaded.then_some(outcome.url.as_str());
        let body = compose_body(url, &trimmed);

        let current = self.deps.alerts.get_alert_memo(&alert.id).await?;
        let merged = merge_section(&current, &body);
        let memo = trim_memo(&merged);
        self.deps.alerts.update_alert_memo(&alert.id, &memo).await?;
        tracing::info!(
            alert_id = %alert.id,
            bytes = memo.len(),
            uploaded = outcome.uploaded,
            "updated alert memo"
        );
        Ok(())
    }

    async fn write_annotations(&self, alert: &Alert, rendered: &[(&SectionSpec, String)]) -> Result<(), WritebackError> {
        let mut by_service: Vec<(&str, Vec<Cow<'_, str>>)> = Vec::new();
        for (spec, text) in rendered {
            let Some(service) = spec.annotation_service.as_deref() else {
                continue;
            };
            let piece = match spec.annotation_cap {
                Some(cap) => truncate_with_ellipsis(text, cap),
                None => Cow::Borrowed(text.as_str()),
            };
            match by_service.iter_mut().find(|(s, _)| *s == service) {
                Some((_, pieces)) => pieces.push(piece),
                None => by_service.push((service, vec![piece])),
            }
        }

        for (service, pieces) in by_service {
            let joined = pieces.join("\n\n");
            let description = truncate_with_ellipsis(&joined, MAX_ANNOTATION_DESCRIPTION_SIZE).into_owned();
            self.upsert_annotation(alert, service, description).await?;
        }
        Ok(())
    }

    async fn upsert_annotation(&self, alert: &Alert, service: &str, description: String) -> Result<(), WritebackError> {
        let from = alert.opened_at;
        let to = alert.closed_at.unwrap_or_else(|| self.deps.clock.epoch_secs());
        let annotation = GraphAnnotation {
            id: None,
            title: annotation_title(&alert.id),
            description,
            from,
            to,
            service: service.to_string(),
            roles: Vec::new(),
        };

        let existing = self
            .deps
            .alerts
            .find_graph_annotations(service, from - ANNOTATION_WINDOW_PADDING, to + ANNOTATION_WINDOW_PADDING)
            .await?;
        match existing.into_iter().find(|a| a.title == annotation.title).and_then(|a| a.id) {
            Some(id) => {
                self.deps.alerts.update_graph_annotation(&id, &annotation).await?;
                tracing::info!(alert_id = %alert.id, service, annotation_id = %id, "updated graph annotation");
            }
            None => {
                let created = self.deps.alerts.create_graph_annotation(&annotation).await?;
                tracing::info!(alert_id = %alert.id, service, annotation_id = ?created.id, "created graph annotation");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "writeback_tests.rs"]
mod tests;
