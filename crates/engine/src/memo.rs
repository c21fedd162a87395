// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tool-owned section of an alert memo

use std::borrow::Cow;

use prepalert_core::truncate_with_ellipsis;

pub const MEMO_HEADER: &str = "## Prepalert";

/// Start of the next same-level section.
pub const SECTION_DELIMITER: &str = "\n## ";

/// Hard cap on the whole memo, in bytes.
pub const MAX_MEMO_SIZE: usize = 80_000;

/// Hard cap on a graph annotation description, in bytes.
pub const MAX_ANNOTATION_DESCRIPTION_SIZE: usize = 1024;

/// Build the section body: header, optional full-text link, then sections
/// separated by a blank line. Trailing newlines are dropped and same-level
/// headings in section text are demoted, so the body merges back onto
/// itself unchanged.
pub fn compose_body(full_text_url: Option<&str>, sections: &[Cow<'_, str>]) -> String {
    let mut body = String::from(MEMO_HEADER);
    body.push('\n');
    if let Some(url) = full_text_url {
        body.push_str("Full Text URL: ");
        body.push_str(url);
        body.push_str("\n\n");
    }
    let joined = sections.iter().map(|s| demote_headings(s)).collect::<Vec<_>>().join("\n\n");
    body.push_str(&joined);
    let trimmed = body.trim_end_matches('\n').len();
    body.truncate(trimmed);
    body
}

/// Turn every `## ` line into `### `. The section ends at the next `\n## `.
fn demote_headings(text: &str) -> Cow<'_, str> {
    if !text.starts_with("## ") && !text.contains(SECTION_DELIMITER) {
        return Cow::Borrowed(text);
    }
    let lines: Vec<Cow<'_, str>> = text
        .split('\n')
        .map(|line| if line.starts_with("## ") { Cow::Owned(format!("#{line}")) } else { Cow::Borrowed(line) })
        .collect();
    Cow::Owned(lines.join("\n"))
}

/// Byte range of the existing section in `memo`, excluding the newlines
/// that separate it from whatever follows.
fn section_range(memo: &str) -> Option<(usize, usize)> {
    let mut search = 0;
    let start = loop {
        let pos = search + memo[search..].find(MEMO_HEADER)?;
        let at_line_start = pos == 0 || memo.as_bytes()[pos - 1] == b'\n';
        let rest = &memo[pos + MEMO_HEADER.len()..];
        let at_line_end = rest.is_empty() || rest.starts_with('\n');
        if at_line_start && at_line_end {
            break pos;
        }
        search = pos + MEMO_HEADER.len();
    };
    let after_header = start + MEMO_HEADER.len();
    let end = memo[after_header..]
        .find(SECTION_DELIMITER)
        .map(|i| after_header + i)
        .unwrap_or(memo.len());
    let end = start + memo[start..end].trim_end_matches('\n').len();
    Some((start, end))
}

/// Replace the tool's section of `current` with `body`, or append it after
/// a blank line when there is none. Text outside the section is kept.
pub fn merge_section(current: &str, body: &str) -> String {
    if let Some((start, end)) = section_range(current) {
        let mut out = String::with_capacity(current.len() - (end - start) + body.len());
        out.push_str(&current[..start]);
        out.push_str(body);
        out.push_str(&current[end..]);
        return out;
    }
    let kept = current.trim_end_matches('\n');
    if kept.trim().is_empty() {
        return body.to_string();
    }
    format!("{kept}\n\n{body}")
}

/// Apply the global memo cap.
pub fn trim_memo(memo: &str) -> Cow<'_, str> {
    truncate_with_ellipsis(memo, MAX_MEMO_SIZE)
}

#[cfg(test)]
#[path = "memo_tests.rs"]
mod tests;
