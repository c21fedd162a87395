// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use prepalert_core::ProviderParameter;
use serde::{Deserialize, Serialize};

/// Request from host to plugin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// First frame on every connection
    Handshake { protocol_version: u32 },

    /// Check a `provider` block before any query is built
    ValidateProviderParameter { provider: ProviderParameter },

    /// Ask which query body attributes the plugin accepts
    GetQuerySchema,

    /// Run one query
    RunQuery {
        provider: ProviderParameter,
        query_name: String,
        /// Query block body, with templates already rendered
        body: serde_json::Value,
        /// `runtime` object of the evaluation scope (`event`, `params`)
        #[serde(default)]
        runtime: serde_json::Value,
    },
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
