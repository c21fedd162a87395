// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use prepalert_core::QueryResult;
use serde::{Deserialize, Serialize};

/// Response from plugin to host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Handshake reply
    Hello { name: String, protocol_version: u32 },

    /// Generic success
    Ok,

    /// Reply to `GetQuerySchema`
    QuerySchema { attributes: Vec<SchemaAttribute> },

    /// Sent while a query is still running; asks the host to extend its
    /// message lease
    KeepAlive {
        #[serde(default = "default_extend_secs")]
        extend_secs: u64,
    },

    /// Final reply to `RunQuery`
    QueryResult { result: QueryResult },

    /// The request failed on the plugin side
    Error { message: String },
}

/// One attribute of a query block body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaAttribute {
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

impl SchemaAttribute {
    pub fn required(name: impl Into<String>) -> Self {
        Self { name: name.into(), required: true }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self { name: name.into(), required: false }
    }
}

fn default_extend_secs() -> u64 {
    30
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
