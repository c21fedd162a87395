// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider parameters as declared in configuration

use serde::{Deserialize, Serialize};

/// Name given to a provider block that carries only a type label.
pub const DEFAULT_PROVIDER_NAME: &str = "default";

/// A `provider "<type>" "<name>" { ... }` block.
///
/// `params` is the block body as raw JSON; the owning provider validates and
/// decodes it when the configuration is compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderParameter {
    #[serde(rename = "type")]
    pub provider_type: String,
    pub name: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ProviderParameter {
    pub fn new(
        provider_type: impl Into<String>,
        name: impl Into<String>,
        params: serde_json::Value,
    ) -> Self {
        Self { provider_type: provider_type.into(), name: name.into(), params }
    }

    /// `<type>.<name>`, the key under the `provider` root variable.
    pub fn id(&self) -> String {
        format!("{}.{}", self.provider_type, self.name)
    }

    /// Environment path the decoded params are bound at.
    pub fn scope_path(&self) -> String {
        format!("provider.{}", self.id())
    }
}
