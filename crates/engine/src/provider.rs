// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider registry and the query contract

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use prepalert_core::{ProviderParameter, QueryResult};
use prepalert_expr::{Scope, Value};
use thiserror::Error;

use crate::context::QueryContext;

/// Errors raised while compiling providers and queries
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider type \"{0}\"")]
    UnknownType(String),
    #[error("provider type \"{0}\" is already registered")]
    DuplicateType(String),
    #[error("invalid provider parameters: {0}")]
    InvalidParameter(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("plugin error: {0}")]
    Plugin(String),
}

/// Errors returned by a running query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The data source answered with an error. Recorded in the scope; the
    /// rule keeps going.
    #[error("{0}")]
    Failed(String),
    /// The provider itself is broken. Fatal to the rule.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Builds providers of one type from their configuration blocks.
pub trait ProviderFactory: Send + Sync + 'static {
    fn build(&self, parameter: &ProviderParameter) -> Result<Arc<dyn Provider>, ProviderError>;
}

/// One configured data source.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    fn parameter(&self) -> &ProviderParameter;

    /// Params exposed read-only at `provider.<type>.<name>`.
    fn decoded_params(&self) -> Value {
        Value::from_json(self.parameter().params.clone())
    }

    /// Compile a named query. Called once per query at load, where
    /// `runtime` is still unknown in `scope`.
    async fn new_query(
        &self,
        name: &str,
        body: &serde_json::Value,
        scope: &Scope,
    ) -> Result<Arc<dyn Query>, ProviderError>;
}

/// A compiled query, reusable across events.
#[async_trait]
pub trait Query: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn run(&self, ctx: &QueryContext, scope: &Scope) -> Result<QueryResult, QueryError>;
}

/// Maps a provider type name to its factory.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the providers compiled into this binary.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.factories.insert(
            crate::providers::command::PROVIDER_TYPE.to_string(),
            Arc::new(crate::providers::CommandProviderFactory),
        );
        registry
    }

    pub fn register(
        &mut self,
        provider_type: impl Into<String>,
        factory: Arc<dyn ProviderFactory>,
    ) -> Result<(), ProviderError> {
        let provider_type = provider_type.into();
        if self.factories.contains_key(&provider_type) {
            return Err(ProviderError::DuplicateType(provider_type));
        }
        self.factories.insert(provider_type, factory);
        Ok(())
    }

    pub fn contains(&self, provider_type: &str) -> bool {
        self.factories.contains_key(provider_type)
    }

    /// Registered type names, sorted.
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn build(&self, parameter: &ProviderParameter) -> Result<Arc<dyn Provider>, ProviderError> {
        let factory = self
            .factories
            .get(&parameter.provider_type)
            .ok_or_else(|| ProviderError::UnknownType(parameter.provider_type.clone()))?;
        factory.build(parameter)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry").field("types", &self.types()).finish()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Clone)]
    enum Script {
        Respond(Result<QueryResult, QueryError>),
        /// Block until the context is cancelled.
        Hang,
    }

    #[derive(Default)]
    struct FakeState {
        scripts: HashMap<String, Script>,
        delays: HashMap<String, Duration>,
        runs: Vec<String>,
        active: usize,
        peak_active: usize,
        built: Vec<ProviderParameter>,
        rejected: HashMap<String, String>,
    }

    /// Scripted provider; also its own factory
    #[derive(Clone, Default)]
    pub struct FakeProvider {
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakeProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the outcome of every run of `query`.
        pub fn respond(&self, query: &str, outcome: Result<QueryResult, QueryError>) {
            self.inner.lock().scripts.insert(query.to_string(), Script::Respond(outcome));
        }

        /// Make `query` wait before answering.
        pub fn delay(&self, query: &str, delay: Duration) {
            self.inner.lock().delays.insert(query.to_string(), delay);
        }

        /// Make `query` run until cancelled.
        pub fn hang(&self, query: &str) {
            self.inner.lock().scripts.insert(query.to_string(), Script::Hang);
        }

        /// Make `new_query` reject `query` with `message`.
        pub fn reject(&self, query: &str, message: &str) {
            self.inner.lock().rejected.insert(query.to_string(), message.to_string());
        }

        /// Query names in the order they ran.
        pub fn runs(&self) -> Vec<String> {
            self.inner.lock().runs.clone()
        }

        /// Most runs in flight at once, across all queries.
        pub fn peak_concurrency(&self) -> usize {
            self.inner.lock().peak_active
        }

        pub fn built(&self) -> Vec<ProviderParameter> {
            self.inner.lock().built.clone()
        }

        /// A query handle without going through a provider block.
        pub fn query(&self, name: &str) -> Arc<dyn Query> {
            Arc::new(FakeQuery { name: name.to_string(), inner: Arc::clone(&self.inner) })
        }
    }

    struct BuiltFake {
        parameter: ProviderParameter,
        inner: Arc<Mutex<FakeState>>,
    }

    impl ProviderFactory for FakeProvider {
        fn build(&self, parameter: &ProviderParameter) -> Result<Arc<dyn Provider>, ProviderError> {
            self.inner.lock().built.push(parameter.clone());
            Ok(Arc::new(BuiltFake { parameter: parameter.clone(), inner: Arc::clone(&self.inner) }))
        }
    }

    #[async_trait]
    impl Provider for BuiltFake {
        fn parameter(&self) -> &ProviderParameter {
            &self.parameter
        }

        async fn new_query(
            &self,
            name: &str,
            _body: &serde_json::Value,
            _scope: &Scope,
        ) -> Result<Arc<dyn Query>, ProviderError> {
            if let Some(message) = self.inner.lock().rejected.get(name) {
                return Err(ProviderError::InvalidQuery(message.clone()));
            }
            Ok(Arc::new(FakeQuery { name: name.to_string(), inner: Arc::clone(&self.inner) }))
        }
    }

    struct FakeQuery {
        name: String,
        inner: Arc<Mutex<FakeState>>,
    }

    struct ActiveRun(Arc<Mutex<FakeState>>);

    impl Drop for ActiveRun {
        fn drop(&mut self) {
            self.0.lock().active -= 1;
        }
    }

    #[async_trait]
    impl Query for FakeQuery {
        fn name(&self) -> &str {
            &self.name
        }

        async fn run(&self, ctx: &QueryContext, _scope: &Scope) -> Result<QueryResult, QueryError> {
            let (script, delay) = {
                let mut inner = self.inner.lock();
                inner.runs.push(self.name.clone());
                inner.active += 1;
                inner.peak_active = inner.peak_active.max(inner.active);
                (inner.scripts.get(&self.name).cloned(), inner.delays.get(&self.name).copied())
            };
            let _active = ActiveRun(Arc::clone(&self.inner));
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match script {
                Some(Script::Respond(outcome)) => outcome,
                Some(Script::Hang) => {
                    ctx.cancelled().await;
                    Err(QueryError::Failed("cancelled".to_string()))
                }
                None => Ok(QueryResult::new(self.name.clone(), "", vec![], vec![], vec![])),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProvider;

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
