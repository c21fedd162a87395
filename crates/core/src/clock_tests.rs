// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_in_whole_seconds() {
    let clock = FakeClock::new(100);
    clock.advance(Duration::from_millis(2_500));
    assert_eq!(clock.epoch_secs(), 102);
}

#[test]
fn fake_clock_set_overrides() {
    let clock = FakeClock::default();
    clock.set(42);
    assert_eq!(clock.epoch_secs(), 42);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::new(0);
    let other = clock.clone();
    clock.advance(Duration::from_secs(60));
    assert_eq!(other.epoch_secs(), 60);
}

#[test]
fn system_clock_is_after_2020() {
    assert!(SystemClock.epoch_secs() > 1_577_836_800);
}
