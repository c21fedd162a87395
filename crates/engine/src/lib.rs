// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! prepalert-engine: rule selection, query execution and write-back
//!
//! A [`Processor`] is compiled once from configuration. Each alert event
//! is matched against its rules; every matching rule runs its queries
//! concurrently and streams rendered sections into one [`Writeback`].

pub mod context;
pub mod executor;
pub mod matcher;
pub mod memo;
pub mod plugin;
pub mod processor;
pub mod provider;
pub mod providers;
pub mod rule;
pub mod writeback;

pub use context::{QueryContext, DEFAULT_LEASE_EXTENSION};
pub use executor::{execute, query_object, ExecuteError, QueryLocks, QueryStatus};
pub use matcher::matches;
pub use plugin::{PluginHost, ProcessLauncher};
pub use processor::{LoadError, ProcessError, Processor};
pub use provider::{Provider, ProviderError, ProviderFactory, ProviderRegistry, Query, QueryError};
pub use providers::{CommandProvider, CommandProviderFactory};
pub use rule::{Predicate, Rule};
pub use writeback::{SectionSpec, Writeback, WritebackDeps, WritebackError};

#[cfg(any(test, feature = "test-support"))]
pub use provider::FakeProvider;
