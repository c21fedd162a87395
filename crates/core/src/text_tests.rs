// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[yare::parameterized(
    under_cap   = { "hello",        10, "hello" },
    at_cap      = { "hello",        5,  "hello" },
    over_cap    = { "hello world",  9,  "hello\n..." },
    tiny_cap    = { "hello world",  2,  "\n." },
    zero_cap    = { "hello",        0,  "" },
    empty       = { "",             3,  "" },
)]
fn truncates(input: &str, max: usize, expected: &str) {
    assert_eq!(truncate_with_ellipsis(input, max), expected);
}

#[test]
fn oversize_memo_is_exactly_cap() {
    let text = "x".repeat(100_000);
    let out = truncate_with_ellipsis(&text, 80_000);
    assert_eq!(out.len(), 80_000);
    assert!(out.ends_with("\n..."));
}

#[test]
fn cut_respects_char_boundaries() {
    // each 'é' is two bytes; a cut at an odd byte must back off
    let text = "é".repeat(10);
    let out = truncate_with_ellipsis(&text, 9);
    assert!(out.len() <= 9);
    assert!(out.ends_with(ELLIPSIS));
    assert_eq!(out, "éé\n...");
}

proptest! {
    #[test]
    fn never_exceeds_cap(text in ".{0,200}", max in 0usize..120) {
        let out = truncate_with_ellipsis(&text, max);
        prop_assert!(out.len() <= max);
    }

    #[test]
    fn truncation_is_idempotent(text in ".{0,200}", max in 5usize..120) {
        let once = truncate_with_ellipsis(&text, max).into_owned();
        let twice = truncate_with_ellipsis(&once, max).into_owned();
        prop_assert_eq!(once, twice);
    }
}
