// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source location tracking for expressions and templates.

/// A byte-offset range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    #[inline]
    pub fn empty(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span { start: self.start.min(other.start), end: self.end.max(other.end) }
    }

    /// Extract the spanned text, or `""` when out of bounds.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// Locate a span in source, returning (line_number, column, line_content).
///
/// Line numbers are 1-indexed; column is 0-indexed in characters.
pub fn locate_span(source: &str, span: Span) -> (usize, usize, &str) {
    let start = span.start.min(source.len());
    let line_start = source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_num = source[..line_start].matches('\n').count() + 1;
    let line_end = source[line_start..].find('\n').map(|i| line_start + i).unwrap_or(source.len());
    let col = source.get(line_start..start).map(|s| s.chars().count()).unwrap_or(0);
    (line_num, col, &source[line_start..line_end])
}

/// Render a message with a line/column pointer into `source`.
///
/// ```text
/// error: Unknown variable
///   --> line 2, column 3
///    |
///  2 | ${nope}
///    |   ^^^^
/// ```
pub fn diagnostic_context(source: &str, span: Span, message: &str) -> String {
    let (line_num, col, line_content) = locate_span(source, span);
    // Carets never run past the end of the reported line
    let room = line_content.chars().count().saturating_sub(col).max(1);
    let carets = span.len().clamp(1, room);

    format!(
        "error: {}\n  --> line {}, column {}\n   |\n{:>3} | {}\n   | {}{}",
        message,
        line_num,
        col + 1,
        line_num,
        line_content,
        " ".repeat(col),
        "^".repeat(carets)
    )
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
