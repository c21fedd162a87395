// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration to running rules
//!
//! [`Processor::load`] builds every provider and compiles every query once.
//! [`Processor::process`] then handles one event at a time: it selects the
//! matching rules and executes them concurrently against a shared
//! write-back.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use prepalert_config::{BackendDef, Config, ConfigError, RuleDef};
use prepalert_core::AlertEvent;
use prepalert_expr::{Scope, Value};
use thiserror::Error;

use crate::context::QueryContext;
use crate::executor::{execute, ExecuteError, QueryLocks};
use crate::matcher::matches;
use crate::plugin::PluginHost;
use crate::provider::{Provider, ProviderError, ProviderRegistry, Query};
use crate::rule::{Predicate, Rule};
use crate::writeback::{SectionSpec, Writeback, WritebackDeps};

/// Errors raised while compiling a configuration
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{location}: {source}")]
    Provider {
        location: String,
        #[source]
        source: ProviderError,
    },
}

impl LoadError {
    fn at(location: impl Into<String>, source: ProviderError) -> Self {
        LoadError::Provider { location: location.into(), source }
    }
}

/// Rules that failed while processing one event.
#[derive(Debug, Error)]
#[error("{}", describe(.failures))]
pub struct ProcessError {
    /// `(rule name, error)` in configuration order.
    pub failures: Vec<(String, ExecuteError)>,
}

impl ProcessError {
    pub fn is_cancelled(&self) -> bool {
        self.failures.iter().any(|(_, e)| matches!(e, ExecuteError::Cancelled))
    }
}

fn describe(failures: &[(String, ExecuteError)]) -> String {
    failures.iter().map(|(rule, e)| format!("rule \"{rule}\": {e}")).collect::<Vec<_>>().join("; ")
}

/// A compiled configuration.
pub struct Processor {
    rules: Vec<Arc<Rule>>,
    queries: HashMap<String, Arc<dyn Query>>,
    base_scope: Scope,
    deps: WritebackDeps,
    plugins: PluginHost,
}

impl Processor {
    /// Load the configuration at `path` and compile it.
    pub async fn load_path(path: &Path, registry: ProviderRegistry, deps: WritebackDeps) -> Result<Self, LoadError> {
        let config = prepalert_config::load(path)?;
        Self::load(&config, registry, deps).await
    }

    /// Compile `config`, launching plugins as child processes.
    pub async fn load(config: &Config, registry: ProviderRegistry, deps: WritebackDeps) -> Result<Self, LoadError> {
        let plugins = PluginHost::new(&config.prepalert.plugins);
        Self::load_with_plugins(config, registry, plugins, deps).await
    }

    /// Compile `config` with an explicit plugin host.
    pub async fn load_with_plugins(
        config: &Config,
        mut registry: ProviderRegistry,
        plugins: PluginHost,
        deps: WritebackDeps,
    ) -> Result<Self, LoadError> {
        let start = Instant::now();
        plugins.register(&mut registry).map_err(|e| LoadError::at("prepalert.plugins", e))?;

        let mut base_scope = Scope::with_stdlib_clock(Arc::clone(&deps.clock));
        let mut providers: HashMap<String, Arc<dyn Provider>> = HashMap::new();
        for def in &config.providers {
            let parameter = def.parameter();
            let provider = registry.build(&parameter).map_err(|e| LoadError::at(parameter.scope_path(), e))?;
            base_scope = base_scope.bind(&parameter.scope_path(), provider.decoded_params());
            providers.insert(parameter.id(), provider);
        }

        // `runtime` only exists per event
        let compile_scope = base_scope.with_variable("runtime", Value::Unknown);
        let mut queries = HashMap::new();
        for def in &config.queries {
            let fqn = def.fqn();
            let location = format!("query.{fqn}");
            let provider_id = format!("{}.{}", def.query_type, def.provider);
            let provider = providers.get(&provider_id).ok_or_else(|| {
                LoadError::at(
                    &location,
                    ProviderError::InvalidQuery(format!("provider \"{provider_id}\" is not defined")),
                )
            })?;
            let query = provider
                .new_query(&def.name, &def.body, &compile_scope)
                .await
                .map_err(|e| LoadError::at(&location, e))?;
            queries.insert(fqn, query);
        }

        let rules = config
            .rules
            .iter()
            .map(|def| compile_rule(def, &queries, config.prepalert.query_timeout).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        let deps = match &config.prepalert.backend {
            BackendDef::Local(local) if deps.object_key.is_none() => match &local.object_key_template {
                Some(template) => deps.with_object_key(template.clone()),
                None => deps,
            },
            _ => deps,
        };

        tracing::info!(
            providers = providers.len(),
            queries = queries.len(),
            rules = rules.len(),
            plugins = ?plugins.plugin_types(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "configuration loaded"
        );
        Ok(Self { rules, queries, base_scope, deps, plugins })
    }

    pub fn rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    /// Functions plus `provider.*`; the parent of every rule scope.
    pub fn base_scope(&self) -> &Scope {
        &self.base_scope
    }

    /// Names of the rules that apply to `event`, in configuration order.
    pub fn matching_rules(&self, event: &AlertEvent) -> Vec<&str> {
        self.rules.iter().filter(|r| matches(r, event)).map(|r| r.name.as_str()).collect()
    }

    /// Run every matching rule for `event`.
    ///
    /// Returns the names of the rules that ran.
    pub async fn process(&self, ctx: &QueryContext, event: &AlertEvent) -> Result<Vec<String>, ProcessError> {
        let alert_id = event.alert_id().unwrap_or_default();
        let matched: Vec<&Arc<Rule>> = self.rules.iter().filter(|r| matches(r, event)).collect();
        if matched.is_empty() {
            tracing::info!(alert_id, "no rule matched");
            return Ok(Vec::new());
        }

        let key_scope = match Value::from_serialize(event) {
            Ok(value) => self.base_scope.bind("runtime.event", value),
            Err(e) => {
                tracing::warn!(alert_id, error = %e, "event not visible to the object key template");
                self.base_scope.clone()
            }
        };
        let specs = matched.iter().map(|r| SectionSpec::for_rule(r)).collect();
        let writeback = Arc::new(Writeback::new(self.deps.clone(), event, key_scope, specs));

        let locks = QueryLocks::new();

        let start = Instant::now();
        let outcomes = join_all(matched.iter().map(|rule| {
            let writeback = Arc::clone(&writeback);
            let locks = &locks;
            async move { (rule.name.clone(), execute(ctx, rule, event, &self.base_scope, &writeback, locks).await) }
        }))
        .await;

        let mut names = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(()) => names.push(name),
                Err(e) => {
                    tracing::error!(alert_id, rule = %name, error = %e, "rule failed");
                    failures.push((name, e));
                }
            }
        }
        tracing::info!(
            alert_id,
            rules = names.len() + failures.len(),
            failed = failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "event processed"
        );
        if failures.is_empty() {
            Ok(names)
        } else {
            Err(ProcessError { failures })
        }
    }

    /// Stop plugin processes.
    pub async fn shutdown(&self) {
        self.plugins.shutdown().await;
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("rules", &self.rules)
            .field("queries", &self.queries.len())
            .finish_non_exhaustive()
    }
}

fn compile_rule(
    def: &RuleDef,
    queries: &HashMap<String, Arc<dyn Query>>,
    query_timeout: std::time::Duration,
) -> Result<Rule, LoadError> {
    let predicate = match (&def.alert.monitor_name, def.alert.any) {
        (Some(name), false) => Predicate::MonitorName(name.clone()),
        _ => Predicate::Any,
    };
    let mut rule = Rule::new(&def.name, def.information.clone())
        .with_predicate(predicate)
        .with_params(Value::from_json(def.params.clone()))
        .with_query_timeout(query_timeout);
    for fqn in &def.query_refs {
        let query = queries.get(fqn).ok_or_else(|| {
            LoadError::at(
                format!("rule.{}.information", def.name),
                ProviderError::InvalidQuery(format!("query \"{fqn}\" is not defined")),
            )
        })?;
        rule = rule.with_query(fqn.clone(), Arc::clone(query));
    }
    rule.on_opened = def.alert.on_opened;
    rule.on_closed = def.alert.on_closed;
    rule.update_alert_memo = def.update_alert_memo;
    rule.post_graph_annotation = def.post_graph_annotation;
    rule.max_memo_size = def.max_memo_size;
    rule.max_annotation_description_size = def.max_annotation_description_size;
    rule.service = def.service.clone();
    Ok(rule)
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
