// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod exec;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use prepalert_adapters::{AlertService, Backend, DisabledBackend, LocalBackend};
use prepalert_config::{BackendDef, Config};
use prepalert_core::SystemClock;
use prepalert_engine::{Processor, ProviderRegistry, WritebackDeps};

use crate::exit_error::ExitError;

/// Read the configuration; failures exit with the config code.
pub fn load_config(path: &Path) -> Result<Config, ExitError> {
    prepalert_config::load(path).map_err(|e| ExitError::config(format!("invalid configuration: {e}")))
}

/// The blob backend the configuration selects.
pub fn backend(config: &Config) -> Arc<dyn Backend> {
    match &config.prepalert.backend {
        BackendDef::Disabled => Arc::new(DisabledBackend),
        BackendDef::Local(local) => Arc::new(LocalBackend::new(&local.dir, &local.base_url)),
    }
}

/// Build providers and compile every query and rule.
pub async fn compile(config: &Config, alerts: Arc<dyn AlertService>) -> Result<Processor, ExitError> {
    let deps = WritebackDeps::new(alerts, backend(config), Arc::new(SystemClock));
    Processor::load(config, ProviderRegistry::with_builtin(), deps)
        .await
        .map_err(|e| ExitError::config(format!("invalid configuration: {e}")))
}
