// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message lease extension.
//!
//! Queue-delivered events hold a visibility lease that long-running queries
//! keep alive. Local invocations have nothing to extend.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("lease extension failed: {0}")]
pub struct LeaseError(pub String);

/// Extends the lease on the message that delivered the current event.
///
/// Extensions set the remaining visibility to `duration`; they do not add
/// to it, so concurrent callers may race freely.
#[async_trait]
pub trait LeaseExtender: Send + Sync + 'static {
    async fn extend(&self, duration: Duration) -> Result<(), LeaseError>;
}

/// Lease for events that did not arrive through a queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLease;

#[async_trait]
impl LeaseExtender for NoopLease {
    async fn extend(&self, _duration: Duration) -> Result<(), LeaseError> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{LeaseError, LeaseExtender};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeLeaseState {
        extensions: Vec<Duration>,
        fail: bool,
    }

    /// Records every extension request
    #[derive(Clone, Default)]
    pub struct FakeLease {
        inner: Arc<Mutex<FakeLeaseState>>,
    }

    impl FakeLease {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every later `extend` call fail
        pub fn fail(&self) {
            self.inner.lock().fail = true;
        }

        pub fn extensions(&self) -> Vec<Duration> {
            self.inner.lock().extensions.clone()
        }
    }

    #[async_trait]
    impl LeaseExtender for FakeLease {
        async fn extend(&self, duration: Duration) -> Result<(), LeaseError> {
            let mut inner = self.inner.lock();
            inner.extensions.push(duration);
            if inner.fail {
                return Err(LeaseError("injected failure".to_string()));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLease;

#[cfg(test)]
#[path = "lease_tests.rs"]
mod tests;
