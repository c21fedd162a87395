// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `prepalert exec`: process one webhook event

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use prepalert_adapters::{AlertService, MackerelClient, NoopLease, DEFAULT_API_BASE};
use prepalert_core::AlertEvent;
use prepalert_engine::QueryContext;
use tokio_util::sync::CancellationToken;

use crate::color;
use crate::dry_run::DryRunAlertService;
use crate::exit_error::{ExitError, EXIT_CONFIG, EXIT_FAILURE, EXIT_INTERRUPTED};

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Webhook event JSON file, or `-` for stdin
    #[arg(value_name = "EVENT")]
    pub event: PathBuf,

    /// Keep writes in memory and print the result instead
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, env = "MACKEREL_APIKEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "MACKEREL_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

/// Read and decode the event at `path` (`-` is stdin).
pub fn read_event(path: &Path) -> Result<AlertEvent> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    parse_event(&text)
}

pub fn parse_event(text: &str) -> Result<AlertEvent> {
    serde_json::from_str(text).context("invalid webhook event")
}

pub async fn handle(args: ExecArgs, config_path: &Path) -> Result<()> {
    let event = read_event(&args.event).map_err(|e| ExitError::new(EXIT_FAILURE, format!("{e:#}")))?;
    let alert_id = event.alert_id().unwrap_or_default().to_string();
    let config = super::load_config(config_path)?;

    let dry_run = args.dry_run.then(|| {
        let service = Arc::new(DryRunAlertService::new());
        service.seed_memo(&alert_id, &event.memo);
        service
    });
    let alerts: Arc<dyn AlertService> = match (&dry_run, &args.api_key) {
        (Some(service), _) => service.clone(),
        (None, Some(key)) => Arc::new(
            MackerelClient::with_base_url(key, &args.api_base).map_err(|e| ExitError::config(e.to_string()))?,
        ),
        (None, None) => {
            return Err(ExitError::new(EXIT_CONFIG, "MACKEREL_APIKEY is required unless --dry-run is given").into())
        }
    };
    let processor = super::compile(&config, alerts).await?;

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling running queries");
                cancel.cancel();
            }
        }
    });
    let ctx = QueryContext::new(cancel, Arc::new(NoopLease));
    let outcome = processor.process(&ctx, &event).await;
    interrupt.abort();
    processor.shutdown().await;

    if let Some(service) = &dry_run {
        print!("{}", service.report(&alert_id, color::header));
    }
    match outcome {
        Ok(rules) if rules.is_empty() => {
            tracing::info!(alert_id, "no rule matched");
            Ok(())
        }
        Ok(rules) => {
            tracing::info!(alert_id, rules = %rules.join(","), "done");
            Ok(())
        }
        Err(e) if e.is_cancelled() => Err(ExitError::new(EXIT_INTERRUPTED, format!("interrupted: {e}")).into()),
        Err(e) => Err(ExitError::new(EXIT_FAILURE, e.to_string()).into()),
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
