// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HCL block walking
//!
//! Each top-level block body is deserialized on its own so that errors can
//! name the block they came from. Cross-references are checked afterwards by
//! [`crate::validate`].

use hcl::{Block, Structure};
use indexmap::IndexMap;
use prepalert_core::provider::DEFAULT_PROVIDER_NAME;
use prepalert_expr::{Diagnostic, DiagnosticKind, Scope, Template, SPECIAL_FORMS};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::duration::parse_duration;
use crate::error::ConfigError;
use crate::find::Source;
use crate::types::{
    AlertMatch, BackendDef, Config, LocalBackendDef, PluginDef, PrepalertBlock, ProviderDef, QueryDef,
    RuleDef,
};
use crate::validate::validate_cross_refs;

/// Parse and validate a single HCL document.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    parse_sources(&[Source::inline(text)])
}

/// Parse several HCL documents as one configuration.
pub fn parse_sources(sources: &[Source]) -> Result<Config, ConfigError> {
    let mut builder = ConfigBuilder::new();
    for source in sources {
        let body = hcl::parse(&source.text)
            .map_err(|e| ConfigError::Syntax { origin: source.origin.clone(), source: e })?;
        for structure in body {
            match structure {
                Structure::Block(block) => builder.add_block(block)?,
                Structure::Attribute(attr) => {
                    return Err(ConfigError::invalid(
                        attr.key.as_str(),
                        "attributes are not allowed at the top level",
                    ))
                }
            }
        }
    }

    let config = builder.finish();
    validate_cross_refs(&config)?;
    tracing::debug!(
        providers = config.providers.len(),
        queries = config.queries.len(),
        rules = config.rules.len(),
        "configuration loaded"
    );
    Ok(config)
}

// ---------------------------------------------------------------------------
// Raw block bodies
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPrepalert {
    service: Option<String>,
    query_timeout: Option<String>,
    #[serde(default)]
    backend: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    plugins: IndexMap<String, PluginDef>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLocalBackend {
    dir: PathBuf,
    base_url: String,
    object_key_template: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    alert: RawAlert,
    params: Option<serde_json::Value>,
    information: String,
    #[serde(default)]
    queries: Vec<String>,
    update_alert_memo: Option<bool>,
    post_graph_annotation: Option<bool>,
    max_memo_size: Option<usize>,
    max_graph_annotation_description_size: Option<usize>,
    service: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAlert {
    #[serde(default)]
    any: bool,
    monitor_name: Option<String>,
    on_opened: Option<bool>,
    on_closed: Option<bool>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

struct ConfigBuilder {
    prepalert: Option<PrepalertBlock>,
    providers: Vec<ProviderDef>,
    queries: Vec<QueryDef>,
    rules: Vec<RuleDef>,
    stdlib: Scope,
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            prepalert: None,
            providers: Vec::new(),
            queries: Vec::new(),
            rules: Vec::new(),
            stdlib: Scope::with_stdlib(),
        }
    }

    fn add_block(&mut self, block: Block) -> Result<(), ConfigError> {
        let labels: Vec<String> = block.labels.iter().map(|l| l.as_str().to_string()).collect();
        match block.identifier.as_str() {
            "prepalert" => self.add_prepalert(&labels, block),
            "provider" => self.add_provider(&labels, block),
            "query" => self.add_query(&labels, block),
            "rule" => self.add_rule(&labels, block),
            other => Err(ConfigError::invalid(
                other,
                format!("unknown block type \"{other}\" (expected prepalert, provider, query or rule)"),
            )),
        }
    }

    fn add_prepalert(&mut self, labels: &[String], block: Block) -> Result<(), ConfigError> {
        expect_labels("prepalert", labels, 0..=0, "prepalert { ... }")?;
        if self.prepalert.is_some() {
            return Err(ConfigError::invalid("prepalert", "duplicate prepalert block"));
        }
        let raw: RawPrepalert = decode_body("prepalert", block)?;

        let query_timeout = match raw.query_timeout {
            Some(s) => parse_duration(&s).map_err(|e| ConfigError::invalid("prepalert.query_timeout", e))?,
            None => crate::types::DEFAULT_QUERY_TIMEOUT,
        };

        let mut backend = BackendDef::Disabled;
        for (kind, body) in raw.backend {
            let location = format!("prepalert.backend.{kind}");
            if !matches!(backend, BackendDef::Disabled) {
                return Err(ConfigError::invalid(location, "only one backend may be configured"));
            }
            if kind != "local" {
                return Err(ConfigError::invalid(
                    location,
                    format!("unsupported backend \"{kind}\" (expected local)"),
                ));
            }
            let raw: RawLocalBackend =
                serde_json::from_value(body).map_err(|e| ConfigError::invalid(&location, e.to_string()))?;
            let object_key_template = match raw.object_key_template {
                Some(src) => Some(parse_template(&format!("{location}.object_key_template"), &src)?),
                None => None,
            };
            backend = BackendDef::Local(LocalBackendDef {
                dir: raw.dir,
                base_url: raw.base_url,
                object_key_template,
            });
        }

        for (name, plugin) in &raw.plugins {
            if plugin.cmd.trim().is_empty() {
                return Err(ConfigError::invalid(format!("prepalert.plugins.{name}.cmd"), "cmd must not be empty"));
            }
        }

        self.prepalert = Some(PrepalertBlock { service: raw.service, query_timeout, backend, plugins: raw.plugins });
        Ok(())
    }

    fn add_provider(&mut self, labels: &[String], block: Block) -> Result<(), ConfigError> {
        expect_labels("provider", labels, 1..=2, "provider \"<type>\" [\"<name>\"] { ... }")?;
        let provider_type = labels[0].clone();
        let name = labels.get(1).cloned().unwrap_or_else(|| DEFAULT_PROVIDER_NAME.to_string());
        let location = format!("provider.{provider_type}.{name}");

        if self.providers.iter().any(|p| p.provider_type == provider_type && p.name == name) {
            return Err(ConfigError::invalid(location, "duplicate provider"));
        }
        let params: serde_json::Value = decode_body(&location, block)?;
        self.providers.push(ProviderDef { provider_type, name, params });
        Ok(())
    }

    fn add_query(&mut self, labels: &[String], block: Block) -> Result<(), ConfigError> {
        expect_labels("query", labels, 2..=2, "query \"<type>\" \"<name>\" { ... }")?;
        let query_type = labels[0].clone();
        let name = labels[1].clone();
        let location = format!("query.{query_type}.{name}");

        if let Some(existing) = self.queries.iter().find(|q| q.name == name) {
            let message = if existing.query_type == query_type {
                "duplicate query".to_string()
            } else {
                format!("duplicate query name \"{name}\" (already defined as {})", existing.fqn())
            };
            return Err(ConfigError::invalid(location, message));
        }

        let mut body: serde_json::Map<String, serde_json::Value> = decode_body(&location, block)?;
        let provider = match body.remove("provider") {
            None => DEFAULT_PROVIDER_NAME.to_string(),
            Some(serde_json::Value::String(s)) => s,
            Some(other) => {
                return Err(ConfigError::invalid(
                    format!("{location}.provider"),
                    format!("expected a provider name, got {other}"),
                ))
            }
        };
        self.queries.push(QueryDef { query_type, name, provider, body: serde_json::Value::Object(body) });
        Ok(())
    }

    fn add_rule(&mut self, labels: &[String], block: Block) -> Result<(), ConfigError> {
        expect_labels("rule", labels, 1..=1, "rule \"<name>\" { ... }")?;
        let name = labels[0].clone();
        let location = format!("rule.{name}");
        if self.rules.iter().any(|r| r.name == name) {
            return Err(ConfigError::invalid(location, "duplicate rule"));
        }
        let raw: RawRule = decode_body(&location, block)?;

        let alert = match (raw.alert.any, raw.alert.monitor_name) {
            (true, Some(_)) => {
                return Err(ConfigError::invalid(
                    format!("{location}.alert"),
                    "any and monitor_name are mutually exclusive",
                ))
            }
            (false, None) => {
                return Err(ConfigError::invalid(format!("{location}.alert"), "either any or monitor_name is required"))
            }
            (any, monitor_name) => AlertMatch {
                any,
                monitor_name,
                on_opened: raw.alert.on_opened.unwrap_or(false),
                on_closed: raw.alert.on_closed.unwrap_or(true),
            },
        };

        let info_location = format!("{location}.information");
        let information = parse_template(&info_location, &raw.information)?;
        self.check_functions(&info_location, &information)?;

        let mut query_refs =
            information_query_refs(&information).map_err(|e| ConfigError::invalid(&info_location, e))?;
        for fqn in raw.queries {
            if fqn.split('.').count() != 2 || fqn.split('.').any(str::is_empty) {
                return Err(ConfigError::invalid(
                    format!("{location}.queries"),
                    format!("\"{fqn}\" is not of the form <type>.<name>"),
                ));
            }
            if !query_refs.contains(&fqn) {
                query_refs.push(fqn);
            }
        }

        self.rules.push(RuleDef {
            name,
            alert,
            params: raw.params.unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            information,
            query_refs,
            update_alert_memo: raw.update_alert_memo.unwrap_or(true),
            post_graph_annotation: raw.post_graph_annotation.unwrap_or(false),
            max_memo_size: raw.max_memo_size,
            max_annotation_description_size: raw.max_graph_annotation_description_size,
            service: raw.service,
        });
        Ok(())
    }

    fn check_functions(&self, location: &str, template: &Template) -> Result<(), ConfigError> {
        for (name, span) in template.functions() {
            if SPECIAL_FORMS.contains(&name.as_str()) || self.stdlib.function(&name).is_some() {
                continue;
            }
            let diag =
                Diagnostic::new(DiagnosticKind::UnknownFunction, format!("there is no function named \"{name}\""), span);
            return Err(ConfigError::invalid(location, diag.render(template.source())));
        }
        Ok(())
    }

    fn finish(self) -> Config {
        let prepalert = self.prepalert.unwrap_or_default();
        let rules = self
            .rules
            .into_iter()
            .map(|mut rule| {
                if rule.service.is_none() {
                    rule.service = prepalert.service.clone();
                }
                rule
            })
            .collect();
        Config { prepalert, providers: self.providers, queries: self.queries, rules }
    }
}

/// The `query.<type>.<name>` fqns a template reads, in first-reference order.
pub(crate) fn information_query_refs(template: &Template) -> Result<Vec<String>, String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for traversal in template.references() {
        if traversal.root != "query" {
            continue;
        }
        let Some([query_type, name]) = traversal.prefix(2) else {
            return Err("query references must have the form query.<type>.<name>".to_string());
        };
        let fqn = format!("{query_type}.{name}");
        if seen.insert(fqn.clone()) {
            out.push(fqn);
        }
    }
    Ok(out)
}

fn expect_labels(
    kind: &str,
    labels: &[String],
    allowed: std::ops::RangeInclusive<usize>,
    usage: &str,
) -> Result<(), ConfigError> {
    if allowed.contains(&labels.len()) {
        return Ok(());
    }
    let location = std::iter::once(kind).chain(labels.iter().map(String::as_str)).collect::<Vec<_>>().join(".");
    Err(ConfigError::invalid(location, format!("expected {usage}, got {} label(s)", labels.len())))
}

fn decode_body<T: DeserializeOwned>(location: &str, block: Block) -> Result<T, ConfigError> {
    hcl::from_body(block.body).map_err(|e| ConfigError::invalid(location, e.to_string()))
}

fn parse_template(location: &str, source: &str) -> Result<Template, ConfigError> {
    Template::parse(source).map_err(|diags| ConfigError::invalid(location, diags.render(source)))
}

#[cfg(test)]
#[path = "parser_tests/mod.rs"]
mod tests;
