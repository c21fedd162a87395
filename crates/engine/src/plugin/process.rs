// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launching plugin binaries as child processes

use std::process::Stdio;

use async_trait::async_trait;
use prepalert_config::PluginDef;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::ChildStderr;

use super::bridge::{BridgeError, Connection, Launcher};

/// Runs `cmd args...` and talks to it over stdin/stdout.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    plugin_type: String,
    def: PluginDef,
}

impl ProcessLauncher {
    pub fn new(plugin_type: impl Into<String>, def: PluginDef) -> Self {
        Self { plugin_type: plugin_type.into(), def }
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self) -> Result<Connection, BridgeError> {
        let mut child = tokio::process::Command::new(&self.def.cmd)
            .args(&self.def.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(BridgeError::Launch)?;
        tracing::info!(plugin = %self.plugin_type, cmd = %self.def.cmd, pid = ?child.id(), "launched plugin");

        if let Some(stderr) = child.stderr.take() {
            forward_stderr(self.plugin_type.clone(), stderr);
        }
        let (Some(stdout), Some(stdin)) = (child.stdout.take(), child.stdin.take()) else {
            return Err(BridgeError::Launch(std::io::Error::other("plugin pipes unavailable")));
        };
        Connection::handshake(Box::new(stdout), Box::new(stdin), Some(child)).await
    }
}

/// Log each stderr line of the plugin until the pipe closes.
fn forward_stderr(plugin: String, stderr: ChildStderr) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => tracing::info!(plugin = %plugin, "{line}"),
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(plugin = %plugin, error = %e, "plugin stderr closed");
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
