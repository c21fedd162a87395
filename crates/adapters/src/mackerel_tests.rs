// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One request as the stub server saw it
#[derive(Debug)]
struct Recorded {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Accept one HTTP/1.1 request and answer it with `status` and `reply`.
async fn serve_once(status: u16, reply: &'static str) -> (String, JoinHandle<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).await.unwrap();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap().to_string();
        let target = parts.next().unwrap().to_string();

        let mut headers = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let (key, value) = line.split_once(':').unwrap();
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().to_string();
            if key == "content-length" {
                content_length = value.parse().unwrap();
            }
            headers.push((key, value));
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await.unwrap();

        let response = format!(
            "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
            reply.len()
        );
        reader.get_mut().write_all(response.as_bytes()).await.unwrap();
        reader.get_mut().flush().await.unwrap();

        Recorded { method, target, headers, body: String::from_utf8(body).unwrap() }
    });
    (format!("http://{addr}"), handle)
}

fn annotation(title: &str, from: i64, to: i64) -> GraphAnnotation {
    GraphAnnotation {
        id: None,
        title: title.to_string(),
        description: "desc".to_string(),
        from,
        to,
        service: "prod".to_string(),
        roles: vec![],
    }
}

#[tokio::test]
async fn get_alert_memo_sends_api_key() {
    let (base, server) = serve_once(200, r#"{"id":"2bj6bp5ZDBa","status":"CRITICAL","memo":"notes"}"#).await;
    let client = MackerelClient::with_base_url("secret-key", &base).unwrap();

    assert_eq!(client.get_alert_memo("2bj6bp5ZDBa").await.unwrap(), "notes");

    let req = server.await.unwrap();
    assert_eq!(req.method, "GET");
    assert_eq!(req.target, "/api/v0/alerts/2bj6bp5ZDBa");
    assert_eq!(req.header("x-api-key"), Some("secret-key"));
}

#[tokio::test]
async fn missing_memo_reads_as_empty() {
    let (base, server) = serve_once(200, r#"{"id":"a"}"#).await;
    let client = MackerelClient::with_base_url("k", &base).unwrap();
    assert_eq!(client.get_alert_memo("a").await.unwrap(), "");
    server.await.unwrap();
}

#[tokio::test]
async fn update_alert_memo_puts_memo_body() {
    let (base, server) = serve_once(200, r#"{"id":"a","memo":"new"}"#).await;
    let client = MackerelClient::with_base_url("k", &format!("{base}/")).unwrap();

    client.update_alert_memo("a", "new").await.unwrap();

    let req = server.await.unwrap();
    assert_eq!(req.method, "PUT");
    assert_eq!(req.target, "/api/v0/alerts/a");
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.json(), json!({"memo": "new"}));
}

#[tokio::test]
async fn find_graph_annotations_passes_window() {
    let (base, server) = serve_once(
        200,
        r#"{"graphAnnotations":[{"id":"x1","title":"t","description":"d","from":10,"to":20,"service":"prod","roles":[]}]}"#,
    )
    .await;
    let client = MackerelClient::with_base_url("k", &base).unwrap();

    let found = client.find_graph_annotations("prod", 100, 200).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id.as_deref(), Some("x1"));
    let req = server.await.unwrap();
    assert_eq!(req.target, "/api/v0/graph-annotations?service=prod&from=100&to=200");
}

#[tokio::test]
async fn create_graph_annotation_posts_camel_case() {
    let (base, server) =
        serve_once(200, r#"{"id":"new1","title":"t","description":"desc","from":1,"to":2,"service":"prod"}"#).await;
    let client = MackerelClient::with_base_url("k", &base).unwrap();

    let created = client.create_graph_annotation(&annotation("t", 1, 2)).await.unwrap();

    assert_eq!(created.id.as_deref(), Some("new1"));
    let req = server.await.unwrap();
    assert_eq!(req.method, "POST");
    assert_eq!(req.target, "/api/v0/graph-annotations");
    assert_eq!(req.json(), json!({"title": "t", "description": "desc", "from": 1, "to": 2, "service": "prod"}));
}

#[tokio::test]
async fn update_graph_annotation_puts_by_id() {
    let (base, server) =
        serve_once(200, r#"{"id":"x1","title":"t","description":"desc","from":1,"to":2,"service":"prod"}"#).await;
    let client = MackerelClient::with_base_url("k", &base).unwrap();

    client.update_graph_annotation("x1", &annotation("t", 1, 2)).await.unwrap();

    let req = server.await.unwrap();
    assert_eq!(req.method, "PUT");
    assert_eq!(req.target, "/api/v0/graph-annotations/x1");
}

#[tokio::test]
async fn non_success_status_is_error_with_body() {
    let (base, server) = serve_once(404, r#"{"error":{"message":"Alert not found"}}"#).await;
    let client = MackerelClient::with_base_url("k", &base).unwrap();

    let err = client.get_alert_memo("nope").await.unwrap_err();

    match err {
        MackerelError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Alert not found"), "{body}");
        }
        other => panic!("expected status error, got {other}"),
    }
    server.await.unwrap();
}

#[test]
fn invalid_api_key_is_rejected() {
    assert!(matches!(MackerelClient::new("bad\nkey"), Err(MackerelError::InvalidApiKey)));
}

#[test]
fn default_base_url() {
    assert_eq!(MackerelClient::new("k").unwrap().base_url(), DEFAULT_API_BASE);
}

// FakeAlertService

#[tokio::test]
async fn fake_round_trips_memo() {
    let fake = FakeAlertService::new();
    fake.set_memo("a", "old");
    assert_eq!(fake.get_alert_memo("a").await.unwrap(), "old");
    fake.update_alert_memo("a", "new").await.unwrap();
    assert_eq!(fake.memo("a").as_deref(), Some("new"));
    assert_eq!(fake.memo_updates(), vec!["new"]);
}

#[tokio::test]
async fn fake_injected_failure_keeps_memo() {
    let fake = FakeAlertService::new();
    fake.set_memo("a", "old");
    fake.fail_memo_updates(500);
    assert!(matches!(fake.update_alert_memo("a", "new").await, Err(MackerelError::Status { status: 500, .. })));
    assert_eq!(fake.memo("a").as_deref(), Some("old"));
}

#[tokio::test]
async fn fake_finds_overlapping_annotations_only() {
    let fake = FakeAlertService::new();
    fake.add_annotation(annotation("inside", 100, 200));
    fake.add_annotation(annotation("before", 0, 50));
    fake.add_annotation(GraphAnnotation { service: "other".into(), ..annotation("other", 100, 200) });

    let found = fake.find_graph_annotations("prod", 150, 300).await.unwrap();
    let titles: Vec<_> = found.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["inside"]);
}

#[tokio::test]
async fn fake_create_then_update() {
    let fake = FakeAlertService::new();
    let created = fake.create_graph_annotation(&annotation("t", 1, 2)).await.unwrap();
    let id = created.id.clone().unwrap();

    let changed = GraphAnnotation { description: "changed".into(), ..created };
    fake.update_graph_annotation(&id, &changed).await.unwrap();

    let all = fake.annotations();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "changed");
    assert!(fake.update_graph_annotation("missing", &changed).await.is_err());
}
