// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn noop_lease_always_succeeds() {
    assert!(NoopLease.extend(Duration::from_secs(30)).await.is_ok());
}

#[tokio::test]
async fn fake_lease_records_extensions() {
    let lease = FakeLease::new();
    lease.extend(Duration::from_secs(30)).await.unwrap();
    lease.extend(Duration::from_secs(60)).await.unwrap();
    assert_eq!(lease.extensions(), vec![Duration::from_secs(30), Duration::from_secs(60)]);
}

#[tokio::test]
async fn fake_lease_failure_is_still_recorded() {
    let lease = FakeLease::new();
    lease.fail();
    assert!(lease.extend(Duration::from_secs(30)).await.is_err());
    assert_eq!(lease.extensions().len(), 1);
}
