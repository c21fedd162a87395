// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule executor
//!
//! Runs a rule's queries concurrently. Every completion rebinds
//! `query.<fqn>` in the rule's scope, re-renders the information template
//! and flushes the write-back, so partial results reach the memo while slow
//! queries are still running.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use prepalert_core::{AlertEvent, QueryResult};
use prepalert_expr::{object, Scope, Value};
use thiserror::Error;
use tokio::task::JoinSet;

use crate::context::QueryContext;
use crate::provider::{Query, QueryError};
use crate::rule::Rule;
use crate::writeback::{Writeback, WritebackError};

/// Errors that end a rule execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("failed to bind event: {0}")]
    Event(String),
    #[error("provider transport failed: {}", .0.join("; "))]
    Transport(Vec<String>),
    #[error("write-back failed: {0}")]
    Writeback(#[from] WritebackError),
    #[error("information template never rendered: {0}")]
    Render(String),
    #[error("cancelled")]
    Cancelled,
}

/// State of one query as seen by templates.
#[derive(Debug, Clone, Copy)]
pub enum QueryStatus<'a> {
    Running,
    Success(&'a QueryResult),
    Failed(&'a str),
}

/// The `query.<fqn>` object for `status`.
///
/// For anything but success, `result` carries the status fields too, so
/// `result_to_table(query.x.y.result)` renders the placeholder.
pub fn query_object(fqn: &str, status: QueryStatus<'_>) -> Value {
    let (status, error, result) = match status {
        QueryStatus::Success(result) => match Value::from_serialize(result) {
            Ok(result) => ("success", Value::Null, Some(result)),
            Err(e) => ("failed", Value::from(format!("unreadable result: {e}")), None),
        },
        QueryStatus::Running => ("running", Value::Null, None),
        QueryStatus::Failed(message) => ("failed", Value::from(message), None),
    };
    let result = result.unwrap_or_else(|| {
        object([
            ("fqn", Value::from(fqn)),
            ("status", Value::from(status)),
            ("error", error.clone()),
        ])
    });
    object([
        ("fqn", Value::from(fqn)),
        ("status", Value::from(status)),
        ("error", error),
        ("result", result),
    ])
}

/// One lock per query handle, shared by every rule of an event.
///
/// Rules that reference the same query run it one after the other.
#[derive(Debug, Clone, Default)]
pub struct QueryLocks {
    locks: Arc<parking_lot::Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl QueryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, fqn: &str) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(self.locks.lock().entry(fqn.to_string()).or_default())
    }
}

struct Progress {
    scope: Scope,
    revision: u64,
    /// Queries that have not completed yet.
    pending: Vec<String>,
    rendered: usize,
    last_render_error: Option<String>,
}

struct Shared {
    rule: Arc<Rule>,
    writeback: Arc<Writeback>,
    progress: parking_lot::Mutex<Progress>,
}

impl Shared {
    fn snapshot(&self) -> Scope {
        self.progress.lock().scope.clone()
    }

    /// Rebind the given queries, then render once against the new scope.
    fn complete(&self, updates: &[(String, Value)]) {
        let (revision, rendered) = {
            let mut progress = self.progress.lock();
            for (fqn, value) in updates {
                progress.scope = progress.scope.bind(&format!("query.{fqn}"), value.clone());
                progress.pending.retain(|p| p != fqn);
            }
            progress.revision += 1;
            let rendered = match self.rule.information.render_string(&progress.scope) {
                Ok(Some(text)) => {
                    progress.rendered += 1;
                    Ok(text)
                }
                Ok(None) => Err("information rendered to an unknown value".to_string()),
                Err(diags) => Err(diags.render(self.rule.information.source())),
            };
            if let Err(message) = &rendered {
                progress.last_render_error = Some(message.clone());
            }
            (progress.revision, rendered)
        };
        match rendered {
            Ok(text) => {
                self.writeback.update(&self.rule.name, revision, text);
            }
            Err(message) => {
                tracing::warn!(rule = %self.rule.name, revision, error = %message, "failed to render information");
            }
        }
    }

    fn pending(&self) -> Vec<String> {
        self.progress.lock().pending.clone()
    }

    fn render_outcome(&self) -> Result<(), ExecuteError> {
        let progress = self.progress.lock();
        match (&progress.last_render_error, progress.rendered) {
            (Some(message), 0) => Err(ExecuteError::Render(message.clone())),
            _ => Ok(()),
        }
    }
}

struct TaskReport {
    transport: Option<String>,
    flush: Result<(), WritebackError>,
}

/// Execute one matched rule for `event`.
///
/// `base_scope` carries the functions and the `provider.*` bindings.
/// `locks` must be shared by every rule executed for the same event.
pub async fn execute(
    ctx: &QueryContext,
    rule: &Arc<Rule>,
    event: &AlertEvent,
    base_scope: &Scope,
    writeback: &Arc<Writeback>,
    locks: &QueryLocks,
) -> Result<(), ExecuteError> {
    let start = Instant::now();
    let event_value = Value::from_serialize(event).map_err(|e| ExecuteError::Event(e.to_string()))?;
    let mut scope = base_scope
        .bind("runtime.params", rule.params.clone())
        .bind("runtime.event", event_value);
    for fqn in rule.query_fqns() {
        scope = scope.bind(&format!("query.{fqn}"), query_object(fqn, QueryStatus::Running));
    }
    tracing::info!(
        rule = %rule.name,
        alert_id = event.alert_id().unwrap_or_default(),
        queries = rule.queries.len(),
        "executing rule"
    );

    let shared = Arc::new(Shared {
        rule: Arc::clone(rule),
        writeback: Arc::clone(writeback),
        progress: parking_lot::Mutex::new(Progress {
            scope,
            revision: 0,
            pending: rule.query_fqns().map(str::to_string).collect(),
            rendered: 0,
            last_render_error: None,
        }),
    });

    if rule.queries.is_empty() {
        shared.complete(&[]);
        writeback.flush(ctx).await?;
        return shared.render_outcome();
    }

    let mut tasks = JoinSet::new();
    let snapshot = shared.snapshot();
    for (fqn, query) in &rule.queries {
        tasks.spawn(run_query(
            ctx.clone(),
            Arc::clone(&shared),
            fqn.clone(),
            Arc::clone(query),
            snapshot.clone(),
            rule.query_timeout,
            locks.get(fqn),
        ));
    }

    let mut transport = Vec::new();
    let mut flush_error = None;
    let cancelled = loop {
        tokio::select! {
            biased;
            _ = ctx.cancelled() => break true,
            next = tasks.join_next() => match next {
                None => break false,
                Some(Ok(report)) => {
                    transport.extend(report.transport);
                    if let Err(e) = report.flush {
                        tracing::warn!(rule = %rule.name, error = %e, "write-back failed");
                        if flush_error.is_none() {
                            flush_error = Some(e);
                        }
                    }
                }
                Some(Err(e)) => transport.push(format!("query task failed: {e}")),
            },
        }
    };

    if cancelled {
        tasks.abort_all();
        while tasks.join_next().await.is_some() {}
        let pending = shared.pending();
        if !pending.is_empty() {
            let updates: Vec<(String, Value)> = pending
                .into_iter()
                .map(|fqn| {
                    let value = query_object(&fqn, QueryStatus::Failed("cancelled"));
                    (fqn, value)
                })
                .collect();
            shared.complete(&updates);
        }
        if let Err(e) = writeback.flush(ctx).await {
            tracing::warn!(rule = %rule.name, error = %e, "write-back after cancellation failed");
        }
        tracing::info!(rule = %rule.name, elapsed_ms = start.elapsed().as_millis() as u64, "rule cancelled");
        return Err(ExecuteError::Cancelled);
    }

    // a task that died never rebound its query
    let crashed = shared.pending();
    if !crashed.is_empty() {
        let updates: Vec<(String, Value)> = crashed
            .into_iter()
            .map(|fqn| {
                let value = query_object(&fqn, QueryStatus::Failed("query task failed"));
                (fqn, value)
            })
            .collect();
        shared.complete(&updates);
        if let Err(e) = writeback.flush(ctx).await {
            tracing::warn!(rule = %rule.name, error = %e, "write-back failed");
            flush_error.get_or_insert(e);
        }
    }

    tracing::info!(rule = %rule.name, elapsed_ms = start.elapsed().as_millis() as u64, "rule complete");
    if !transport.is_empty() {
        return Err(ExecuteError::Transport(transport));
    }
    if let Some(e) = flush_error {
        return Err(ExecuteError::Writeback(e));
    }
    shared.render_outcome()
}

async fn run_query(
    ctx: QueryContext,
    shared: Arc<Shared>,
    fqn: String,
    query: Arc<dyn Query>,
    scope: Scope,
    timeout: Duration,
    lock: Arc<tokio::sync::Mutex<()>>,
) -> TaskReport {
    let (outcome, elapsed) = {
        let _serial = lock.lock().await;
        let start = Instant::now();
        let outcome = match tokio::time::timeout(timeout, query.run(&ctx, &scope)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(QueryError::Failed(format!("timed out after {timeout:?}"))),
        };
        (outcome, start.elapsed())
    };
    let elapsed_ms = elapsed.as_millis() as u64;
    let rule = shared.rule.name.as_str();

    let (value, transport) = match &outcome {
        Ok(result) => {
            tracing::info!(rule, fqn = %fqn, rows = result.rows.len(), elapsed_ms, "query succeeded");
            (query_object(&fqn, QueryStatus::Success(result)), None)
        }
        Err(QueryError::Failed(message)) => {
            tracing::warn!(rule, fqn = %fqn, error = %message, elapsed_ms, "query failed");
            (query_object(&fqn, QueryStatus::Failed(message)), None)
        }
        Err(QueryError::Transport(message)) => {
            tracing::error!(rule, fqn = %fqn, error = %message, elapsed_ms, "query transport failed");
            (query_object(&fqn, QueryStatus::Failed(message)), Some(format!("{fqn}: {message}")))
        }
    };

    shared.complete(&[(fqn, value)]);
    let flush = shared.writeback.flush(&ctx).await;
    TaskReport { transport, flush }
}

#[cfg(test)]
#[path = "executor_tests/mod.rs"]
mod tests;
