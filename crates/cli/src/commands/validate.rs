// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `prepalert validate`

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::dry_run::DryRunAlertService;

pub async fn handle(config_path: &Path) -> Result<()> {
    let config = super::load_config(config_path)?;
    let processor = super::compile(&config, Arc::new(DryRunAlertService::new())).await?;
    println!("config ok: {} rules, {} queries", processor.rules().len(), processor.query_count());
    processor.shutdown().await;
    Ok(())
}
