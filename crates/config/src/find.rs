// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file discovery

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::parser::parse_sources;
use crate::types::Config;

/// One HCL document and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub origin: String,
    pub text: String,
}

impl Source {
    pub fn inline(text: impl Into<String>) -> Self {
        Self { origin: "<inline>".to_string(), text: text.into() }
    }
}

/// Load a configuration from a file, or from every `*.hcl` file in a
/// directory in sorted order.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let sources = collect_sources(path)?;
    parse_sources(&sources)
}

pub fn collect_sources(path: &Path) -> Result<Vec<Source>, ConfigError> {
    let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };
    if !path.is_dir() {
        return Ok(vec![read_source(path)?]);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "hcl"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ConfigError::NoFiles(path.to_path_buf()));
    }
    files.iter().map(|p| read_source(p)).collect()
}

fn read_source(path: &Path) -> Result<Source, ConfigError> {
    let text =
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    Ok(Source { origin: path.display().to_string(), text })
}

#[cfg(test)]
#[path = "find_tests.rs"]
mod tests;
