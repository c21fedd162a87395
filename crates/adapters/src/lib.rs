// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! prepalert-adapters: outbound I/O behind traits
//!
//! - [`AlertService`]: the monitoring service's alert and graph annotation API
//! - [`Backend`]: blob storage for the untrimmed memo text
//! - [`LeaseExtender`]: visibility extension for queue-delivered events

pub mod backend;
pub mod lease;
pub mod mackerel;

pub use backend::{Backend, BackendError, DisabledBackend, LocalBackend, UploadOutcome};
pub use lease::{LeaseError, LeaseExtender, NoopLease};
pub use mackerel::{AlertService, GraphAnnotation, MackerelClient, MackerelError, DEFAULT_API_BASE};

#[cfg(any(test, feature = "test-support"))]
pub use backend::FakeBackend;
#[cfg(any(test, feature = "test-support"))]
pub use lease::FakeLease;
#[cfg(any(test, feature = "test-support"))]
pub use mackerel::{AlertCall, FakeAlertService};
