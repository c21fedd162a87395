// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mackerel alert and graph annotation API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.mackerelio.com";

const API_KEY_HEADER: &str = "X-Api-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum MackerelError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid API key")]
    InvalidApiKey,
}

/// A graph annotation as the API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub from: i64,
    pub to: i64,
    pub service: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// Outbound calls against the monitoring service.
#[async_trait]
pub trait AlertService: Send + Sync + 'static {
    /// Current memo text of an alert
    async fn get_alert_memo(&self, alert_id: &str) -> Result<String, MackerelError>;

    async fn update_alert_memo(&self, alert_id: &str, memo: &str) -> Result<(), MackerelError>;

    /// Annotations on `service` overlapping `[from, to]` (Unix seconds)
    async fn find_graph_annotations(
        &self,
        service: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<GraphAnnotation>, MackerelError>;

    async fn create_graph_annotation(&self, annotation: &GraphAnnotation) -> Result<GraphAnnotation, MackerelError>;

    async fn update_graph_annotation(
        &self,
        id: &str,
        annotation: &GraphAnnotation,
    ) -> Result<GraphAnnotation, MackerelError>;
}

#[derive(Deserialize)]
struct AlertBody {
    #[serde(default)]
    memo: String,
}

#[derive(Serialize)]
struct MemoBody<'a> {
    memo: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationList {
    #[serde(default)]
    graph_annotations: Vec<GraphAnnotation>,
}

/// HTTP client for the Mackerel API.
#[derive(Clone, Debug)]
pub struct MackerelClient {
    http: reqwest::Client,
    base_url: String,
    api_key: HeaderValue,
}

impl MackerelClient {
    pub fn new(api_key: &str) -> Result<Self, MackerelError> {
        Self::with_base_url(api_key, DEFAULT_API_BASE)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, MackerelError> {
        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| MackerelError::InvalidApiKey)?;
        api_key.set_sensitive(true);
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), api_key })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, self.api_key.clone())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, MackerelError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MackerelError::Status { status: status.as_u16(), body });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AlertService for MackerelClient {
    async fn get_alert_memo(&self, alert_id: &str) -> Result<String, MackerelError> {
        let alert: AlertBody = self.send(self.request(Method::GET, &format!("/api/v0/alerts/{alert_id}"))).await?;
        Ok(alert.memo)
    }

    async fn update_alert_memo(&self, alert_id: &str, memo: &str) -> Result<(), MackerelError> {
        let request = self.request(Method::PUT, &format!("/api/v0/alerts/{alert_id}")).json(&MemoBody { memo });
        let _: serde_json::Value = self.send(request).await?;
        tracing::debug!(alert_id, bytes = memo.len(), "updated alert memo");
        Ok(())
    }

    async fn find_graph_annotations(
        &self,
        service: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<GraphAnnotation>, MackerelError> {
        let request = self.request(Method::GET, "/api/v0/graph-annotations").query(&[
            ("service", service.to_string()),
            ("from", from.to_string()),
            ("to", to.to_string()),
        ]);
        let list: AnnotationList = self.send(request).await?;
        Ok(list.graph_annotations)
    }

    async fn create_graph_annotation(&self, annotation: &GraphAnnotation) -> Result<GraphAnnotation, MackerelError> {
        let request = self.request(Method::POST, "/api/v0/graph-annotations").json(annotation);
        self.send(request).await
    }

    async fn update_graph_annotation(
        &self,
        id: &str,
        annotation: &GraphAnnotation,
    ) -> Result<GraphAnnotation, MackerelError> {
        let request = self.request(Method::PUT, &format!("/api/v0/graph-annotations/{id}")).json(annotation);
        self.send(request).await
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{AlertService, GraphAnnotation, MackerelError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Recorded outbound call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AlertCall {
        GetAlert { alert_id: String },
        UpdateAlert { alert_id: String, memo: String },
        FindAnnotations { service: String, from: i64, to: i64 },
        CreateAnnotation { annotation: GraphAnnotation },
        UpdateAnnotation { id: String, annotation: GraphAnnotation },
    }

    #[derive(Default)]
    struct FakeAlertState {
        memos: HashMap<String, String>,
        annotations: Vec<GraphAnnotation>,
        calls: Vec<AlertCall>,
        next_id: u64,
        fail_memo_updates: Option<u16>,
    }

    /// In-memory alert service for testing
    #[derive(Clone, Default)]
    pub struct FakeAlertService {
        inner: Arc<Mutex<FakeAlertState>>,
    }

    impl FakeAlertService {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed an alert's memo
        pub fn set_memo(&self, alert_id: &str, memo: &str) {
            self.inner.lock().memos.insert(alert_id.to_string(), memo.to_string());
        }

        pub fn memo(&self, alert_id: &str) -> Option<String> {
            self.inner.lock().memos.get(alert_id).cloned()
        }

        /// Seed an existing annotation; an id is assigned if missing
        pub fn add_annotation(&self, mut annotation: GraphAnnotation) -> GraphAnnotation {
            let mut inner = self.inner.lock();
            if annotation.id.is_none() {
                inner.next_id += 1;
                annotation.id = Some(format!("ann-{}", inner.next_id));
            }
            inner.annotations.push(annotation.clone());
            annotation
        }

        pub fn annotations(&self) -> Vec<GraphAnnotation> {
            self.inner.lock().annotations.clone()
        }

        pub fn calls(&self) -> Vec<AlertCall> {
            self.inner.lock().calls.clone()
        }

        /// Memos written, in order
        pub fn memo_updates(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    AlertCall::UpdateAlert { memo, .. } => Some(memo),
                    _ => None,
                })
                .collect()
        }

        /// Make memo updates fail with the given HTTP status
        pub fn fail_memo_updates(&self, status: u16) {
            self.inner.lock().fail_memo_updates = Some(status);
        }
    }

    #[async_trait]
    impl AlertService for FakeAlertService {
        async fn get_alert_memo(&self, alert_id: &str) -> Result<String, MackerelError> {
            let mut inner = self.inner.lock();
            inner.calls.push(AlertCall::GetAlert { alert_id: alert_id.to_string() });
            Ok(inner.memos.get(alert_id).cloned().unwrap_or_default())
        }

        async fn update_alert_memo(&self, alert_id: &str, memo: &str) -> Result<(), MackerelError> {
            let mut inner = self.inner.lock();
            inner.calls.push(AlertCall::UpdateAlert { alert_id: alert_id.to_string(), memo: memo.to_string() });
            if let Some(status) = inner.fail_memo_updates {
                return Err(MackerelError::Status { status, body: "injected failure".to_string() });
            }
            inner.memos.insert(alert_id.to_string(), memo.to_string());
            Ok(())
        }

        async fn find_graph_annotations(
            &self,
            service: &str,
            from: i64,
            to: i64,
        ) -> Result<Vec<GraphAnnotation>, MackerelError> {
            let mut inner = self.inner.lock();
            inner.calls.push(AlertCall::FindAnnotations { service: service.to_string(), from, to });
            Ok(inner
                .annotations
                .iter()
                .filter(|a| a.service == service && a.from <= to && a.to >= from)
                .cloned()
                .collect())
        }

        async fn create_graph_annotation(&self, annotation: &GraphAnnotation) -> Result<GraphAnnotation, MackerelError> {
            let mut inner = self.inner.lock();
            inner.calls.push(AlertCall::CreateAnnotation { annotation: annotation.clone() });
            inner.next_id += 1;
            let created = GraphAnnotation { id: Some(format!("ann-{}", inner.next_id)), ..annotation.clone() };
            inner.annotations.push(created.clone());
            Ok(created)
        }

        async fn update_graph_annotation(
            &self,
            id: &str,
            annotation: &GraphAnnotation,
        ) -> Result<GraphAnnotation, MackerelError> {
            let mut inner = self.inner.lock();
            inner.calls.push(AlertCall::UpdateAnnotation { id: id.to_string(), annotation: annotation.clone() });
            let updated = GraphAnnotation { id: Some(id.to_string()), ..annotation.clone() };
            match inner.annotations.iter_mut().find(|a| a.id.as_deref() == Some(id)) {
                Some(existing) => *existing = updated.clone(),
                None => return Err(MackerelError::Status { status: 404, body: format!("annotation {id} not found") }),
            }
            Ok(updated)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{AlertCall, FakeAlertService};

#[cfg(test)]
#[path = "mackerel_tests.rs"]
mod tests;
