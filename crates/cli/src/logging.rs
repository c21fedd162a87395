// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tracing-subscriber setup

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PREPALERT_LOG";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// `PREPALERT_LOG` when set and valid, otherwise `level`.
pub fn filter(env_value: Option<&str>, level: &str) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    match env_value.filter(|v| !v.trim().is_empty()) {
        Some(directives) => EnvFilter::try_new(directives).or_else(|_| EnvFilter::try_new(level)),
        None => EnvFilter::try_new(level),
    }
}

/// Install the global subscriber. Logs go to stderr; stdout is for results.
pub fn init(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = filter(env_value.as_deref(), level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
