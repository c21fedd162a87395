// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One handshaken connection to a plugin

use std::time::Duration;

use async_trait::async_trait;
use prepalert_wire::{read_response, write_request, ProtocolError, Request, Response, PROTOCOL_VERSION};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::context::QueryContext;

pub type BoxReader = Box<dyn AsyncRead + Send + Unpin>;
pub type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to launch plugin: {0}")]
    Launch(#[source] std::io::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// The plugin answered with `Response::Error`.
    #[error("{0}")]
    Remote(String),
    #[error("cancelled")]
    Cancelled,
}

/// Starts a plugin and returns a handshaken connection to it.
#[async_trait]
pub trait Launcher: Send + Sync + 'static {
    async fn launch(&self) -> Result<Connection, BridgeError>;
}

/// A live connection. Dropping it kills the child, if there is one.
pub struct Connection {
    name: String,
    reader: BoxReader,
    writer: BoxWriter,
    child: Option<tokio::process::Child>,
}

impl Connection {
    /// Send `Handshake` and wait for a matching `Hello`.
    pub async fn handshake(
        mut reader: BoxReader,
        mut writer: BoxWriter,
        child: Option<tokio::process::Child>,
    ) -> Result<Self, BridgeError> {
        write_request(&mut writer, &Request::Handshake { protocol_version: PROTOCOL_VERSION })
            .await?;
        match read_response(&mut reader).await? {
            Response::Hello { name, protocol_version } if protocol_version == PROTOCOL_VERSION => {
                Ok(Self { name, reader, writer, child })
            }
            Response::Hello { protocol_version, .. } => Err(ProtocolError::VersionMismatch {
                host: PROTOCOL_VERSION,
                plugin: protocol_version,
            }
            .into()),
            other => Err(ProtocolError::Unexpected(format!("{other:?}")).into()),
        }
    }

    /// Name the plugin reported in its `Hello`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send one request and wait for its final response.
    ///
    /// `KeepAlive` frames in between extend the lease held by `ctx`. When
    /// `ctx` is cancelled mid-call the connection state is unknown and the
    /// caller must drop it.
    pub async fn call(
        &mut self,
        request: &Request,
        ctx: Option<&QueryContext>,
    ) -> Result<Response, BridgeError> {
        write_request(&mut self.writer, request).await?;
        loop {
            let response = match ctx {
                Some(ctx) => tokio::select! {
                    response = read_response(&mut self.reader) => response?,
                    _ = ctx.cancelled() => return Err(BridgeError::Cancelled),
                },
                None => read_response(&mut self.reader).await?,
            };
            match response {
                Response::KeepAlive { extend_secs } => {
                    if let Some(ctx) = ctx {
                        ctx.extend_lease(Duration::from_secs(extend_secs)).await;
                    }
                }
                other => return Ok(other),
            }
        }
    }

    /// Kill the child and wait for it to exit.
    pub async fn close(mut self) {
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.kill().await {
                tracing::debug!(plugin = %self.name, error = %e, "plugin already exited");
            }
        }
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
