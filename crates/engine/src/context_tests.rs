// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use prepalert_adapters::FakeLease;

#[tokio::test]
async fn extend_lease_forwards_to_extender() {
    let lease = FakeLease::new();
    let ctx = QueryContext::new(CancellationToken::new(), Arc::new(lease.clone()));
    ctx.extend_lease(DEFAULT_LEASE_EXTENSION).await;
    ctx.extend_lease(Duration::from_secs(5)).await;
    assert_eq!(lease.extensions(), vec![Duration::from_secs(30), Duration::from_secs(5)]);
}

#[tokio::test]
async fn extend_lease_failure_is_swallowed() {
    let lease = FakeLease::new();
    lease.fail();
    let ctx = QueryContext::new(CancellationToken::new(), Arc::new(lease));
    ctx.extend_lease(DEFAULT_LEASE_EXTENSION).await;
    assert!(!ctx.is_cancelled());
}

#[tokio::test]
async fn clones_share_cancellation() {
    let ctx = QueryContext::detached();
    let clone = ctx.clone();
    ctx.cancel_token().cancel();
    assert!(clone.is_cancelled());
    tokio::time::timeout(Duration::from_secs(1), clone.cancelled()).await.unwrap();
}
