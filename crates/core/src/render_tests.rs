// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::{Cell, QueryResult};
use serde_json::json;

fn sample() -> QueryResult {
    QueryResult::new(
        "q",
        "SELECT a, b",
        vec![],
        vec!["a".into(), "b".into()],
        vec![vec![Cell::from("1"), Cell::from("2")]],
    )
}

#[test]
fn table_has_header_and_row() {
    let table = sample().to_table();
    assert!(table.contains("| a | b |"), "{table}");
    assert!(table.contains("| 1 | 2 |"), "{table}");
    assert!(table.starts_with('+'), "{table}");
}

#[test]
fn markdown_table_has_pipes() {
    let md = sample().to_markdown_table();
    assert!(md.contains("| a | b |"), "{md}");
    assert!(md.contains("| 1 | 2 |"), "{md}");
}

#[test]
fn borderless_table_has_no_pipes() {
    let text = sample().to_borderless_table();
    assert!(!text.contains('|'), "{text}");
    assert!(text.contains('a') && text.contains('2'), "{text}");
}

#[test]
fn vertical_aligns_column_names() {
    let result = QueryResult::new(
        "q",
        "",
        vec![],
        vec!["id".into(), "name".into()],
        vec![vec![Cell::from_value(&json!(7)), Cell::from("alice")]],
    );
    let text = result.to_vertical();
    assert!(text.contains(" 1. row "), "{text}");
    assert!(text.contains("  id: 7\n"), "{text}");
    assert!(text.contains("name: alice\n"), "{text}");
}

#[test]
fn jsonlines_keeps_raw_cells() {
    let result = QueryResult::new(
        "q",
        "",
        vec![],
        vec!["n".into(), "s".into()],
        vec![vec![Cell::from_value(&json!(12345678901234567u64)), Cell::null()]],
    );
    assert_eq!(result.to_jsonlines(), "{\"n\":12345678901234567,\"s\":null}\n");
}

#[test]
fn plain_is_tab_separated() {
    assert_eq!(sample().to_plain(), "a\tb\n1\t2\n");
}

#[test]
fn empty_result_renders_header_only() {
    let result = QueryResult::new("q", "", vec![], vec!["a".into()], vec![]);
    assert_eq!(result.to_plain(), "a\n");
    assert_eq!(result.to_jsonlines(), "");
    assert_eq!(result.to_vertical(), "");
}
