// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Providers compiled into the binary

pub mod command;

pub use command::{CommandProvider, CommandProviderFactory};
