// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Out-of-process providers
//!
//! Each plugin type declared in configuration maps to one child process that
//! speaks the `prepalert-wire` protocol on its stdin/stdout.

pub mod bridge;
pub mod host;
pub mod process;

#[cfg(test)]
pub(crate) mod test_plugin;

pub use bridge::{BridgeError, Connection, Launcher};
pub use host::{PluginClient, PluginHost, PluginProvider};
pub use process::ProcessLauncher;
