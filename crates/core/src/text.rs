// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Size-capped text helpers

use std::borrow::Cow;

/// Marker appended to text cut short by [`truncate_with_ellipsis`].
pub const ELLIPSIS: &str = "\n...";

/// Cap `text` at `max` bytes, replacing the cut tail with [`ELLIPSIS`].
///
/// The result is exactly `max` bytes when the cut lands on a character
/// boundary, and never more. Text already within the cap is returned as is.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> Cow<'_, str> {
    if text.len() <= max {
        return Cow::Borrowed(text);
    }
    if max <= ELLIPSIS.len() {
        return Cow::Owned(ELLIPSIS[..max].to_string());
    }
    let mut cut = max - ELLIPSIS.len();
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut out = String::with_capacity(cut + ELLIPSIS.len());
    out.push_str(&text[..cut]);
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
