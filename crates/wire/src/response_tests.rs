// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn keep_alive_defaults_to_thirty_seconds() {
    let resp: Response = serde_json::from_str(r#"{"type":"KeepAlive"}"#).unwrap();
    assert_eq!(resp, Response::KeepAlive { extend_secs: 30 });
}

#[test]
fn schema_attribute_required_defaults_false() {
    let resp: Response =
        serde_json::from_value(json!({"type": "QuerySchema", "attributes": [{"name": "sql", "required": true}, {"name": "params"}]}))
            .unwrap();
    assert_eq!(
        resp,
        Response::QuerySchema {
            attributes: vec![SchemaAttribute::required("sql"), SchemaAttribute::optional("params")]
        }
    );
}

#[test]
fn query_result_cells_decode() {
    let json = r#"{"type":"QueryResult","result":{"name":"q","columns":["n","s"],"rows":[[1.5,"x"]]}}"#;
    let Response::QueryResult { result } = serde_json::from_str(json).unwrap() else {
        panic!("expected QueryResult");
    };
    assert_eq!(result.columns, vec!["n", "s"]);
    assert_eq!(result.rows[0][0].raw(), "1.5");
    assert_eq!(result.rows[0][1].display_text(), "x");
}
