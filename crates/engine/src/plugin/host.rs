// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Providers backed by plugin processes

use std::sync::Arc;

use async_trait::async_trait;
use prepalert_config::PluginDef;
use prepalert_core::{ProviderParameter, QueryResult};
use prepalert_expr::{Scope, Template};
use prepalert_wire::{ProtocolError, Request, Response, SchemaAttribute};
use tokio::sync::{Mutex, OnceCell};

use super::bridge::{BridgeError, Connection, Launcher};
use super::process::ProcessLauncher;
use crate::context::QueryContext;
use crate::provider::{Provider, ProviderError, ProviderFactory, ProviderRegistry, Query, QueryError};

/// Shared handle to one plugin binary.
///
/// At most one request is in flight. The child starts on first use and is
/// relaunched on the call after a failed one.
pub struct PluginClient {
    plugin_type: String,
    launcher: Box<dyn Launcher>,
    conn: Mutex<Option<Connection>>,
    schema: OnceCell<Vec<SchemaAttribute>>,
}

impl PluginClient {
    pub fn new(plugin_type: impl Into<String>, launcher: Box<dyn Launcher>) -> Self {
        Self {
            plugin_type: plugin_type.into(),
            launcher,
            conn: Mutex::new(None),
            schema: OnceCell::new(),
        }
    }

    pub fn plugin_type(&self) -> &str {
        &self.plugin_type
    }

    pub async fn is_running(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    pub async fn call(
        &self,
        request: &Request,
        ctx: Option<&QueryContext>,
    ) -> Result<Response, BridgeError> {
        let mut guard = self.conn.lock().await;
        let mut conn = match guard.take() {
            Some(conn) => conn,
            None => {
                let conn = self.launcher.launch().await?;
                tracing::debug!(plugin = %self.plugin_type, name = conn.name(), "plugin handshake complete");
                conn
            }
        };
        match conn.call(request, ctx).await {
            Ok(response) => {
                *guard = Some(conn);
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(plugin = %self.plugin_type, error = %e, "dropping plugin connection");
                conn.close().await;
                Err(e)
            }
        }
    }

    /// Query body attributes the plugin accepts; fetched once.
    pub async fn schema(&self) -> Result<&[SchemaAttribute], BridgeError> {
        let attributes = self
            .schema
            .get_or_try_init(|| async {
                match self.call(&Request::GetQuerySchema, None).await? {
                    Response::QuerySchema { attributes } => Ok(attributes),
                    Response::Error { message } => Err(BridgeError::Remote(message)),
                    other => Err(ProtocolError::Unexpected(format!("{other:?}")).into()),
                }
            })
            .await?;
        Ok(attributes)
    }

    /// Kill the child, if running.
    pub async fn shutdown(&self) {
        let conn = self.conn.lock().await.take();
        if let Some(conn) = conn {
            tracing::info!(plugin = %self.plugin_type, "stopping plugin");
            conn.close().await;
        }
    }
}

/// Every plugin declared in `prepalert { plugins { ... } }`.
#[derive(Default)]
pub struct PluginHost {
    clients: Vec<Arc<PluginClient>>,
}

impl PluginHost {
    pub fn new<'a>(plugins: impl IntoIterator<Item = (&'a String, &'a PluginDef)>) -> Self {
        Self::with_launchers(plugins.into_iter().map(|(plugin_type, def)| {
            let launcher: Box<dyn Launcher> = Box::new(ProcessLauncher::new(plugin_type, def.clone()));
            (plugin_type.clone(), launcher)
        }))
    }

    pub fn with_launchers(launchers: impl IntoIterator<Item = (String, Box<dyn Launcher>)>) -> Self {
        let clients = launchers
            .into_iter()
            .map(|(plugin_type, launcher)| Arc::new(PluginClient::new(plugin_type, launcher)))
            .collect();
        Self { clients }
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn plugin_types(&self) -> Vec<&str> {
        self.clients.iter().map(|c| c.plugin_type()).collect()
    }

    /// Add a factory per plugin type to `registry`.
    pub fn register(&self, registry: &mut ProviderRegistry) -> Result<(), ProviderError> {
        for client in &self.clients {
            registry.register(
                client.plugin_type(),
                Arc::new(PluginProviderFactory { client: Arc::clone(client) }),
            )?;
        }
        Ok(())
    }

    pub async fn shutdown(&self) {
        for client in &self.clients {
            client.shutdown().await;
        }
    }
}

struct PluginProviderFactory {
    client: Arc<PluginClient>,
}

impl ProviderFactory for PluginProviderFactory {
    fn build(&self, parameter: &ProviderParameter) -> Result<Arc<dyn Provider>, ProviderError> {
        Ok(Arc::new(PluginProvider {
            parameter: parameter.clone(),
            client: Arc::clone(&self.client),
            validated: OnceCell::new(),
        }))
    }
}

/// A provider block whose type is served by a plugin.
pub struct PluginProvider {
    parameter: ProviderParameter,
    client: Arc<PluginClient>,
    validated: OnceCell<()>,
}

impl PluginProvider {
    async fn validate(&self) -> Result<(), ProviderError> {
        self.validated
            .get_or_try_init(|| async {
                let request = Request::ValidateProviderParameter { provider: self.parameter.clone() };
                match self.client.call(&request, None).await {
                    Ok(Response::Ok) => Ok(()),
                    Ok(Response::Error { message }) => Err(ProviderError::InvalidParameter(message)),
                    Ok(other) => Err(ProviderError::Plugin(format!("unexpected response: {other:?}"))),
                    Err(e) => Err(ProviderError::Plugin(e.to_string())),
                }
            })
            .await?;
        Ok(())
    }
}

fn check_schema(body: &serde_json::Map<String, serde_json::Value>, schema: &[SchemaAttribute]) -> Vec<String> {
    let mut problems = Vec::new();
    for key in body.keys() {
        if !schema.iter().any(|a| &a.name == key) {
            problems.push(format!("unknown attribute \"{key}\""));
        }
    }
    for attr in schema.iter().filter(|a| a.required) {
        if !body.contains_key(&attr.name) {
            problems.push(format!("missing required attribute \"{}\"", attr.name));
        }
    }
    problems
}

#[async_trait]
impl Provider for PluginProvider {
    fn parameter(&self) -> &ProviderParameter {
        &self.parameter
    }

    async fn new_query(
        &self,
        name: &str,
        body: &serde_json::Value,
        _scope: &Scope,
    ) -> Result<Arc<dyn Query>, ProviderError> {
        self.validate().await?;
        let schema = self.client.schema().await.map_err(|e| ProviderError::Plugin(e.to_string()))?;

        let empty = serde_json::Map::new();
        let map = match body {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => &empty,
            _ => return Err(ProviderError::InvalidQuery("query body must be an object".to_string())),
        };
        let problems = check_schema(map, schema);
        if !problems.is_empty() {
            return Err(ProviderError::InvalidQuery(problems.join("; ")));
        }

        let mut attributes = Vec::with_capacity(map.len());
        for (key, value) in map {
            let attribute = match value {
                serde_json::Value::String(text) => BodyAttribute::Template(
                    Template::parse(text)
                        .map_err(|d| ProviderError::InvalidQuery(format!("{key}: {}", d.render(text))))?,
                ),
                other => BodyAttribute::Literal(other.clone()),
            };
            attributes.push((key.clone(), attribute));
        }

        Ok(Arc::new(PluginQuery {
            name: name.to_string(),
            parameter: self.parameter.clone(),
            attributes,
            client: Arc::clone(&self.client),
        }))
    }
}

enum BodyAttribute {
    Template(Template),
    Literal(serde_json::Value),
}

struct PluginQuery {
    name: String,
    parameter: ProviderParameter,
    attributes: Vec<(String, BodyAttribute)>,
    client: Arc<PluginClient>,
}

impl PluginQuery {
    fn render_body(&self, scope: &Scope) -> Result<serde_json::Value, QueryError> {
        let mut body = serde_json::Map::new();
        for (key, attribute) in &self.attributes {
            let value = match attribute {
                BodyAttribute::Literal(value) => value.clone(),
                BodyAttribute::Template(template) => match template.render_string(scope) {
                    Ok(Some(text)) => serde_json::Value::String(text),
                    Ok(None) => {
                        return Err(QueryError::Failed(format!("{key} depends on unknown values")))
                    }
                    Err(diags) => {
                        return Err(QueryError::Failed(format!("{key}: {}", diags.render(template.source()))))
                    }
                },
            };
            body.insert(key.clone(), value);
        }
        Ok(serde_json::Value::Object(body))
    }
}

#[async_trait]
impl Query for PluginQuery {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: &QueryContext, scope: &Scope) -> Result<QueryResult, QueryError> {
        let request = Request::RunQuery {
            provider: self.parameter.clone(),
            query_name: self.name.clone(),
            body: self.render_body(scope)?,
            runtime: scope.lookup("runtime").map(|v| v.to_json()).unwrap_or_default(),
        };
        match self.client.call(&request, Some(ctx)).await {
            Ok(Response::QueryResult { result }) => Ok(result),
            Ok(Response::Error { message }) => Err(QueryError::Failed(message)),
            Ok(other) => Err(QueryError::Transport(format!("unexpected response: {other:?}"))),
            Err(BridgeError::Cancelled) => Err(QueryError::Failed("cancelled".to_string())),
            Err(e) => Err(QueryError::Transport(e.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
