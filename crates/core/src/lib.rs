// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! prepalert-core: shared data model for the prepalert alert enrichment tool

pub mod macros;

pub mod clock;
pub mod event;
pub mod provider;
pub mod render;
pub mod result;
pub mod text;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
#[cfg(any(test, feature = "test-support"))]
pub use event::AlertBuilder;
pub use event::{Alert, AlertEvent, Host, Role, Service};
pub use provider::ProviderParameter;
pub use result::{Cell, QueryParam, QueryResult};
pub use text::{truncate_with_ellipsis, ELLIPSIS};
