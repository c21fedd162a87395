// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::plugin::test_plugin::{reply, DuplexLauncher};
use prepalert_adapters::FakeLease;
use prepalert_core::ProviderParameter;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn run_request(query_name: &str) -> Request {
    Request::RunQuery {
        provider: ProviderParameter::new("fake", "default", json!({})),
        query_name: query_name.to_string(),
        body: json!({"statement": "SELECT 1"}),
        runtime: json!({"event": {"alert": {"id": "2bj6bp5ZDBa"}}}),
    }
}

#[tokio::test]
async fn handshake_records_plugin_name() {
    let conn = DuplexLauncher::new().launch().await.unwrap();
    assert_eq!(conn.name(), "fake-plugin");
}

#[tokio::test]
async fn handshake_rejects_other_protocol_versions() {
    fn old_plugin(request: &Request) -> Vec<Response> {
        match request {
            Request::Handshake { .. } => {
                vec![Response::Hello { name: "old".to_string(), protocol_version: PROTOCOL_VERSION + 1 }]
            }
            other => reply(other),
        }
    }
    let err = DuplexLauncher::with_handler(old_plugin).launch().await.err().unwrap();
    assert!(
        matches!(err, BridgeError::Protocol(ProtocolError::VersionMismatch { host, .. }) if host == PROTOCOL_VERSION),
        "{err}"
    );
}

#[tokio::test]
async fn handshake_rejects_non_hello() {
    fn rude_plugin(_: &Request) -> Vec<Response> {
        vec![Response::Ok]
    }
    let err = DuplexLauncher::with_handler(rude_plugin).launch().await.err().unwrap();
    assert!(matches!(err, BridgeError::Protocol(ProtocolError::Unexpected(_))), "{err}");
}

#[tokio::test]
async fn keep_alive_frames_extend_the_lease() {
    let lease = FakeLease::new();
    let ctx = QueryContext::new(CancellationToken::new(), Arc::new(lease.clone()));
    let mut conn = DuplexLauncher::new().launch().await.unwrap();

    let response = conn.call(&run_request("slow"), Some(&ctx)).await.unwrap();
    assert!(matches!(response, Response::QueryResult { .. }));
    assert_eq!(lease.extensions(), vec![Duration::from_secs(5), Duration::from_secs(7)]);
}

#[tokio::test]
async fn keep_alive_without_context_is_skipped() {
    let mut conn = DuplexLauncher::new().launch().await.unwrap();
    let response = conn.call(&run_request("slow"), None).await.unwrap();
    assert!(matches!(response, Response::QueryResult { .. }));
}

#[tokio::test]
async fn closed_connection_is_a_protocol_error() {
    let mut conn = DuplexLauncher::new().launch().await.unwrap();
    let err = conn.call(&run_request("crash"), None).await.unwrap_err();
    assert!(matches!(err, BridgeError::Protocol(ProtocolError::ConnectionClosed)), "{err}");
}

#[tokio::test]
async fn cancelled_context_abandons_the_call() {
    fn silent_plugin(request: &Request) -> Vec<Response> {
        match request {
            // never answers queries; the keep-alive keeps the connection open
            Request::RunQuery { .. } => vec![Response::KeepAlive { extend_secs: 1 }],
            other => reply(other),
        }
    }
    let ctx = QueryContext::detached();
    let mut conn = DuplexLauncher::with_handler(silent_plugin).launch().await.unwrap();
    let token = ctx.cancel_token().clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });
    let err = tokio::time::timeout(Duration::from_secs(5), conn.call(&run_request("q"), Some(&ctx)))
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, BridgeError::Cancelled));
}
