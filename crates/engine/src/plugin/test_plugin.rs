// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory plugin served over `tokio::io::duplex`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use prepalert_core::test_support::simple_result;
use prepalert_wire::{read_request, write_response, Request, Response, SchemaAttribute, PROTOCOL_VERSION};
use tokio::io::{AsyncRead, AsyncWrite};

use super::bridge::{BridgeError, Connection, Launcher};

/// Replies for one request. An empty list closes the connection.
pub fn reply(request: &Request) -> Vec<Response> {
    match request {
        Request::Handshake { .. } => {
            vec![Response::Hello { name: "fake-plugin".to_string(), protocol_version: PROTOCOL_VERSION }]
        }
        Request::ValidateProviderParameter { provider } => match provider.params.get("reject") {
            Some(reason) => vec![Response::Error { message: reason.as_str().unwrap_or("rejected").to_string() }],
            None => vec![Response::Ok],
        },
        Request::GetQuerySchema => vec![Response::QuerySchema {
            attributes: vec![SchemaAttribute::required("statement"), SchemaAttribute::optional("limit")],
        }],
        Request::RunQuery { query_name, body, runtime, .. } => {
            let statement = body.get("statement").and_then(|v| v.as_str()).unwrap_or_default();
            let alert_id = runtime
                .pointer("/event/alert/id")
                .and_then(|v| v.as_str())
                .unwrap_or("none");
            let result = Response::QueryResult {
                result: simple_result(query_name, &["statement", "alert"], &[&[statement, alert_id]]),
            };
            match query_name.as_str() {
                "crash" => vec![],
                "fails" => vec![Response::Error { message: "syntax error near FROM".to_string() }],
                "slow" => vec![
                    Response::KeepAlive { extend_secs: 5 },
                    Response::KeepAlive { extend_secs: 7 },
                    result,
                ],
                _ => vec![result],
            }
        }
    }
}

/// Serve requests until the host hangs up or a reply list is empty.
pub async fn serve<R, W>(mut reader: R, mut writer: W, handler: fn(&Request) -> Vec<Response>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Ok(request) = read_request(&mut reader).await {
        let replies = handler(&request);
        if replies.is_empty() {
            return;
        }
        for response in replies {
            if write_response(&mut writer, &response).await.is_err() {
                return;
            }
        }
    }
}

/// Launches a fresh in-memory plugin per call and counts launches.
#[derive(Clone)]
pub struct DuplexLauncher {
    handler: fn(&Request) -> Vec<Response>,
    launches: Arc<AtomicUsize>,
}

impl DuplexLauncher {
    pub fn new() -> Self {
        Self::with_handler(reply)
    }

    pub fn with_handler(handler: fn(&Request) -> Vec<Response>) -> Self {
        Self { handler, launches: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Launcher for DuplexLauncher {
    async fn launch(&self) -> Result<Connection, BridgeError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let (host, plugin) = tokio::io::duplex(64 * 1024);
        let (plugin_read, plugin_write) = tokio::io::split(plugin);
        tokio::spawn(serve(plugin_read, plugin_write, self.handler));
        let (host_read, host_write) = tokio::io::split(host);
        Connection::handshake(Box::new(host_read), Box::new(host_write), None).await
    }
}
