// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RPC protocol between prepalert and out-of-process provider plugins.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload
//!
//! The host speaks first with [`Request::Handshake`] and the plugin answers
//! [`Response::Hello`]. After that each request gets exactly one final
//! response; [`Request::RunQuery`] may be preceded by any number of
//! [`Response::KeepAlive`] frames.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod wire;

pub use request::Request;
pub use response::{Response, SchemaAttribute};
pub use wire::{decode, encode, read_message, write_message, ProtocolError, MAX_MESSAGE_SIZE};
pub use wire::{read_request, read_response, write_request, write_response};

/// Bumped on any incompatible change to [`Request`] or [`Response`].
pub const PROTOCOL_VERSION: u32 = 1;

#[cfg(test)]
mod property_tests;
