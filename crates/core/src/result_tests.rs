// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use serde_json::json;

fn line(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

#[test]
fn sql_rows_encode_null_as_json_null() {
    let rows: Vec<Result<_, std::convert::Infallible>> = vec![
        Ok(vec![Some(json!(1)), None]),
        Ok(vec![Some(json!("x")), Some(json!(2.5))]),
    ];
    let result = QueryResult::from_sql_rows(
        "q",
        "SELECT a, b FROM t",
        vec![],
        vec!["a".into(), "b".into()],
        rows,
    )
    .unwrap();
    assert_eq!(result.rows[0][0].raw(), "1");
    assert!(result.rows[0][1].is_null());
    assert_eq!(result.rows[1][0].raw(), "\"x\"");
    assert_eq!(result.rows[1][1].raw(), "2.5");
}

#[test]
fn sql_rows_pad_short_rows() {
    let rows: Vec<Result<_, std::convert::Infallible>> = vec![Ok(vec![Some(json!(1))])];
    let result =
        QueryResult::from_sql_rows("q", "", vec![], vec!["a".into(), "b".into()], rows).unwrap();
    assert_eq!(result.rows[0].len(), 2);
    assert!(result.rows[0][1].is_null());
}

#[test]
fn sql_rows_propagate_first_error() {
    let rows = vec![Ok(vec![Some(json!(1))]), Err("broken row"), Ok(vec![None])];
    let err = QueryResult::from_sql_rows("q", "", vec![], vec!["a".into()], rows).unwrap_err();
    assert_eq!(err, "broken row");
}

#[test]
fn jsonlines_union_keys_with_time_first() {
    let lines = vec![
        line(json!({"status": 500, "timestamp": "2024-01-01"})),
        line(json!({"path": "/", "status": 502, "time_taken": 1.5})),
    ];
    let result = QueryResult::from_jsonlines("q", "", vec![], &lines);
    assert_eq!(result.columns, vec!["timestamp", "time_taken", "status", "path"]);
    assert_eq!(result.rows[0][2].raw(), "500");
    assert!(result.rows[0][3].is_null());
    assert!(result.rows[1][0].is_null());
    assert_eq!(result.rows[1][1].raw(), "1.5");
}

#[test]
fn parse_jsonlines_skips_blank_lines() {
    let text = "{\"a\":1}\n\n{\"a\":2,\"b\":\"x\"}\n";
    let result = QueryResult::parse_jsonlines("q", "cmd", vec![], text).unwrap();
    assert_eq!(result.columns, vec!["a", "b"]);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.statement, "cmd");
}

#[test]
fn parse_jsonlines_rejects_non_objects() {
    assert!(QueryResult::parse_jsonlines("q", "", vec![], "[1,2]\n").is_err());
}

#[yare::parameterized(
    string = { json!("hello"), "hello" },
    number = { json!(42),      "42" },
    null   = { json!(null),    "null" },
    bool   = { json!(true),    "true" },
    object = { json!({"k": 1}), "{\"k\":1}" },
)]
fn cell_display_text(value: serde_json::Value, expected: &str) {
    assert_eq!(Cell::from_value(&value).display_text(), expected);
}

#[test]
fn result_survives_value_round_trip() {
    let result = QueryResult::new(
        "q",
        "SELECT 1",
        vec![QueryParam::Positional(json!(1)), QueryParam::Named { name: "n".into(), value: json!("v") }],
        vec!["a".into()],
        vec![vec![Cell::from("1")], vec![Cell::null()]],
    );
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["rows"][0][0], "1");
    assert!(value["rows"][1][0].is_null());
    let back: QueryResult = serde_json::from_value(value).unwrap();
    assert_eq!(back, result);
}

proptest! {
    #[test]
    fn jsonlines_time_columns_precede_others(keys in proptest::collection::vec("(time|x)[a-c]{1,2}", 1..8)) {
        let mut map = serde_json::Map::new();
        for key in &keys {
            map.insert(key.clone(), json!(1));
        }
        let result = QueryResult::from_jsonlines("q", "", vec![], &[map]);
        let first_other = result.columns.iter().position(|c| !c.starts_with("time"));
        if let Some(idx) = first_other {
            prop_assert!(result.columns[idx..].iter().all(|c| !c.starts_with("time")));
        }
    }
}
