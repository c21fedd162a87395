// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `command` provider: run a shell command, read JSON lines from stdout
//!
//! ```hcl
//! provider "command" { shell = "bash" }
//! query "command" "errors" {
//!   command = "grep -c ERROR app.log | jq -c '{count: .}'"
//! }
//! ```

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use prepalert_core::{ProviderParameter, QueryResult};
use prepalert_expr::{Scope, Template};
use serde::Deserialize;
use tokio::io::AsyncReadExt;

use crate::context::{QueryContext, DEFAULT_LEASE_EXTENSION};
use crate::provider::{Provider, ProviderError, ProviderFactory, Query, QueryError};

pub const PROVIDER_TYPE: &str = "command";

/// How often a running command extends the delivery lease.
pub const LEASE_TICK: Duration = Duration::from_secs(10);

const DEFAULT_SHELL: &str = "sh";

/// Environment overrides in sorted order.
type EnvMap = std::collections::BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandParams {
    #[serde(default)]
    shell: Option<String>,
    #[serde(default)]
    env: EnvMap,
    #[serde(default)]
    dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandBody {
    command: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandProviderFactory;

impl ProviderFactory for CommandProviderFactory {
    fn build(&self, parameter: &ProviderParameter) -> Result<Arc<dyn Provider>, ProviderError> {
        Ok(Arc::new(CommandProvider::new(parameter)?))
    }
}

#[derive(Debug)]
pub struct CommandProvider {
    parameter: ProviderParameter,
    settings: Arc<Settings>,
}

#[derive(Debug)]
struct Settings {
    shell: String,
    env: EnvMap,
    dir: Option<PathBuf>,
}

impl CommandProvider {
    pub fn new(parameter: &ProviderParameter) -> Result<Self, ProviderError> {
        let params = if parameter.params.is_null() {
            CommandParams { shell: None, env: EnvMap::new(), dir: None }
        } else {
            serde_json::from_value::<CommandParams>(parameter.params.clone())
                .map_err(|e| ProviderError::InvalidParameter(e.to_string()))?
        };
        let shell = params.shell.unwrap_or_else(|| DEFAULT_SHELL.to_string());
        if shell.trim().is_empty() {
            return Err(ProviderError::InvalidParameter("shell must not be empty".to_string()));
        }
        Ok(Self {
            parameter: parameter.clone(),
            settings: Arc::new(Settings { shell, env: params.env, dir: params.dir }),
        })
    }
}

#[async_trait]
impl Provider for CommandProvider {
    fn parameter(&self) -> &ProviderParameter {
        &self.parameter
    }

    async fn new_query(
        &self,
        name: &str,
        body: &serde_json::Value,
        _scope: &Scope,
    ) -> Result<Arc<dyn Query>, ProviderError> {
        let body = serde_json::from_value::<CommandBody>(body.clone())
            .map_err(|e| ProviderError::InvalidQuery(e.to_string()))?;
        let command = Template::parse(&body.command)
            .map_err(|d| ProviderError::InvalidQuery(d.render(&body.command)))?;
        Ok(Arc::new(CommandQuery {
            name: name.to_string(),
            command,
            settings: Arc::clone(&self.settings),
        }))
    }
}

struct CommandQuery {
    name: String,
    command: Template,
    settings: Arc<Settings>,
}

#[async_trait]
impl Query for CommandQuery {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: &QueryContext, scope: &Scope) -> Result<QueryResult, QueryError> {
        let command = match self.command.render_string(scope) {
            Ok(Some(command)) => command,
            Ok(None) => {
                return Err(QueryError::Failed("command depends on unknown values".to_string()))
            }
            Err(diags) => return Err(QueryError::Failed(diags.render(self.command.source()))),
        };

        let mut cmd = tokio::process::Command::new(&self.settings.shell);
        cmd.arg("-c")
            .arg(&command)
            .envs(&self.settings.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.settings.dir {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        tracing::debug!(query = %self.name, %command, "running command");
        let mut child = cmd
            .spawn()
            .map_err(|e| QueryError::Failed(format!("failed to spawn {}: {e}", self.settings.shell)))?;

        // Drain both pipes while waiting so a chatty child never blocks.
        let stdout = child.stdout.take().map(|mut out| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                out.read_to_end(&mut buf).await.map(|_| buf)
            })
        });
        let stderr = child.stderr.take().map(|mut err| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                err.read_to_end(&mut buf).await.map(|_| buf)
            })
        });

        let mut ticker =
            tokio::time::interval_at(tokio::time::Instant::now() + LEASE_TICK, LEASE_TICK);
        let status = loop {
            tokio::select! {
                status = child.wait() => {
                    break status.map_err(|e| QueryError::Failed(format!("failed to wait for command: {e}")))?;
                }
                _ = ctx.cancelled() => {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(query = %self.name, error = %e, "failed to kill command");
                    }
                    return Err(QueryError::Failed("cancelled".to_string()));
                }
                _ = ticker.tick() => ctx.extend_lease(DEFAULT_LEASE_EXTENSION).await,
            }
        };

        let stdout = collect(stdout).await;
        let stderr = collect(stderr).await;
        tracing::info!(
            query = %self.name,
            exit_code = ?status.code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "command finished"
        );

        if !status.success() {
            let text = String::from_utf8_lossy(&stderr);
            let message = text
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(|l| l.trim().to_string())
                .unwrap_or_else(|| match status.code() {
                    Some(code) => format!("command exited with status {code}"),
                    None => "command terminated by signal".to_string(),
                });
            return Err(QueryError::Failed(message));
        }

        let text = String::from_utf8_lossy(&stdout);
        QueryResult::parse_jsonlines(self.name.clone(), command, vec![], &text)
            .map_err(|e| QueryError::Failed(format!("command output is not JSON lines: {e}")))
    }
}

async fn collect(
    handle: Option<tokio::task::JoinHandle<std::io::Result<Vec<u8>>>>,
) -> Vec<u8> {
    match handle {
        Some(handle) => match handle.await {
            Ok(Ok(buf)) => buf,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to read command output");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "command output reader panicked");
                Vec::new()
            }
        },
        None => Vec::new(),
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
