// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated configuration model.

use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexMap;
use prepalert_core::ProviderParameter;
use prepalert_expr::Template;
use serde::Deserialize;

/// Per-query hard timeout when `prepalert.query_timeout` is unset.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// A loaded and cross-checked configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub prepalert: PrepalertBlock,
    /// Provider blocks in declaration order.
    pub providers: Vec<ProviderDef>,
    /// Query blocks in declaration order.
    pub queries: Vec<QueryDef>,
    /// Rule blocks in declaration order.
    pub rules: Vec<RuleDef>,
}

impl Config {
    pub fn query(&self, fqn: &str) -> Option<&QueryDef> {
        self.queries.iter().find(|q| q.fqn() == fqn)
    }

    pub fn provider(&self, provider_type: &str, name: &str) -> Option<&ProviderDef> {
        self.providers.iter().find(|p| p.provider_type == provider_type && p.name == name)
    }
}

/// The top-level `prepalert { ... }` block.
#[derive(Debug, Clone)]
pub struct PrepalertBlock {
    /// Default graph annotation service for rules that set none.
    pub service: Option<String>,
    pub query_timeout: Duration,
    pub backend: BackendDef,
    /// Out-of-process provider binaries keyed by provider type.
    pub plugins: IndexMap<String, PluginDef>,
}

impl Default for PrepalertBlock {
    fn default() -> Self {
        Self {
            service: None,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            backend: BackendDef::Disabled,
            plugins: IndexMap::new(),
        }
    }
}

/// Where the untrimmed memo text is uploaded.
#[derive(Debug, Clone, Default)]
pub enum BackendDef {
    #[default]
    Disabled,
    Local(LocalBackendDef),
}

#[derive(Debug, Clone)]
pub struct LocalBackendDef {
    pub dir: PathBuf,
    pub base_url: String,
    /// Object key template; `alerts/<alert_id>.md` when unset.
    pub object_key_template: Option<Template>,
}

/// `plugins { <type> = { cmd = "...", args = [...] } }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginDef {
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A `provider "<type>" ["<name>"] { ... }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDef {
    pub provider_type: String,
    pub name: String,
    /// Block body as JSON; validated by the provider implementation.
    pub params: serde_json::Value,
}

impl ProviderDef {
    pub fn parameter(&self) -> ProviderParameter {
        ProviderParameter::new(&self.provider_type, &self.name, self.params.clone())
    }
}

/// A `query "<type>" "<name>" { ... }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDef {
    pub query_type: String,
    pub name: String,
    /// Name of the provider of the same type.
    pub provider: String,
    /// Remaining attributes, interpreted by the provider.
    pub body: serde_json::Value,
}

impl QueryDef {
    /// `<type>.<name>`
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.query_type, self.name)
    }
}

/// The `alert { ... }` block of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMatch {
    pub any: bool,
    pub monitor_name: Option<String>,
    pub on_opened: bool,
    pub on_closed: bool,
}

/// A `rule "<name>" { ... }` block.
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub name: String,
    pub alert: AlertMatch,
    pub params: serde_json::Value,
    pub information: Template,
    /// Query fqns the rule depends on, in first-reference order.
    pub query_refs: Vec<String>,
    pub update_alert_memo: bool,
    pub post_graph_annotation: bool,
    pub max_memo_size: Option<usize>,
    pub max_annotation_description_size: Option<usize>,
    /// Effective annotation service (the rule's, or `prepalert.service`).
    pub service: Option<String>,
}
