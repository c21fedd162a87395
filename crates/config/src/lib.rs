// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! prepalert-config: HCL configuration loading and validation
//!
//! ```hcl
//! prepalert {
//!   service = "prod"
//! }
//!
//! provider "command" {}
//!
//! query "command" "errors" {
//!   command = "tail -n 100 /var/log/app.log | jq -c '{line: .}'"
//! }
//!
//! rule "high_error_rate" {
//!   alert { monitor_name = "Error rate" }
//!   information = "${result_to_table(query.command.errors)}"
//! }
//! ```

mod duration;
mod error;
mod find;
mod parser;
mod types;
mod validate;

pub use duration::parse_duration;
pub use error::ConfigError;
pub use find::{collect_sources, load, Source};
pub use parser::{parse_config, parse_sources};
pub use types::{
    AlertMatch, BackendDef, Config, LocalBackendDef, PluginDef, PrepalertBlock, ProviderDef, QueryDef,
    RuleDef, DEFAULT_QUERY_TIMEOUT,
};
