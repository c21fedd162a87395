// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled rules

use std::sync::Arc;
use std::time::Duration;

use prepalert_config::DEFAULT_QUERY_TIMEOUT;
use prepalert_expr::{Template, Value};

use crate::provider::Query;

/// Which alerts a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Any,
    MonitorName(String),
}

/// A rule ready to execute. Immutable once loaded.
#[derive(Clone)]
pub struct Rule {
    pub name: String,
    pub predicate: Predicate,
    pub on_opened: bool,
    pub on_closed: bool,
    /// `(fqn, query)` in first-reference order.
    pub queries: Vec<(String, Arc<dyn Query>)>,
    pub information: Template,
    pub params: Value,
    pub update_alert_memo: bool,
    pub post_graph_annotation: bool,
    pub max_memo_size: Option<usize>,
    pub max_annotation_description_size: Option<usize>,
    /// Graph annotation service.
    pub service: Option<String>,
    pub query_timeout: Duration,
}

impl Rule {
    /// Rule matching every event, writing only the memo.
    pub fn new(name: impl Into<String>, information: Template) -> Self {
        Self {
            name: name.into(),
            predicate: Predicate::Any,
            on_opened: false,
            on_closed: true,
            queries: Vec::new(),
            information,
            params: Value::Null,
            update_alert_memo: true,
            post_graph_annotation: false,
            max_memo_size: None,
            max_annotation_description_size: None,
            service: None,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn with_query(mut self, fqn: impl Into<String>, query: Arc<dyn Query>) -> Self {
        self.queries.push((fqn.into(), query));
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Also post a graph annotation to `service`.
    pub fn with_annotation(mut self, service: impl Into<String>) -> Self {
        self.post_graph_annotation = true;
        self.service = Some(service.into());
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn query_fqns(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(|(fqn, _)| fqn.as_str())
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("predicate", &self.predicate)
            .field("on_opened", &self.on_opened)
            .field("on_closed", &self.on_closed)
            .field("queries", &self.query_fqns().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
