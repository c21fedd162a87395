// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-event context handed to every query

use std::sync::Arc;
use std::time::Duration;

use prepalert_adapters::{LeaseExtender, NoopLease};
use tokio_util::sync::CancellationToken;

/// Lease extension requested by long-running queries.
pub const DEFAULT_LEASE_EXTENSION: Duration = Duration::from_secs(30);

/// Cancellation and lease handle for one webhook delivery.
///
/// Cloning is cheap; clones share the token and the lease.
#[derive(Clone)]
pub struct QueryContext {
    cancel: CancellationToken,
    lease: Arc<dyn LeaseExtender>,
}

impl QueryContext {
    pub fn new(cancel: CancellationToken, lease: Arc<dyn LeaseExtender>) -> Self {
        Self { cancel, lease }
    }

    /// A context that is never cancelled and has no lease to extend.
    pub fn detached() -> Self {
        Self::new(CancellationToken::new(), Arc::new(NoopLease))
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the delivery is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Ask the delivery mechanism for more time.
    ///
    /// Failures are logged and otherwise ignored: a lost lease shows up as
    /// cancellation.
    pub async fn extend_lease(&self, by: Duration) {
        if let Err(e) = self.lease.extend(by).await {
            tracing::warn!(error = %e, extend_secs = by.as_secs(), "failed to extend lease");
        }
    }
}

impl std::fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryContext").field("cancelled", &self.is_cancelled()).finish()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
