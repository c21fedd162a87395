// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a configuration.
///
/// Validation errors carry a `block.label.attr` location.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no .hcl files found in {}", .0.display())]
    NoFiles(PathBuf),

    #[error("{origin}: {source}")]
    Syntax {
        origin: String,
        #[source]
        source: hcl::Error,
    },

    #[error("{location}: {message}")]
    Invalid { location: String, message: String },
}

impl ConfigError {
    pub fn invalid(location: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid { location: location.into(), message: message.into() }
    }

    /// The `block.label.attr` location of a validation error.
    pub fn location(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { location, .. } => Some(location),
            _ => None,
        }
    }
}
