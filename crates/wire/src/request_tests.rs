// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire shape of requests; plugins written in other languages rely on it.

use super::*;
use serde_json::json;

#[test]
fn run_query_shape() {
    let req = Request::RunQuery {
        provider: ProviderParameter::new("athena", "default", json!({"region": "ap-northeast-1"})),
        query_name: "errors".into(),
        body: json!({"sql": "select 1"}),
        runtime: json!({"params": {}}),
    };
    assert_eq!(
        serde_json::to_value(&req).unwrap(),
        json!({
            "type": "RunQuery",
            "provider": {"type": "athena", "name": "default", "params": {"region": "ap-northeast-1"}},
            "query_name": "errors",
            "body": {"sql": "select 1"},
            "runtime": {"params": {}},
        })
    );
}

#[test]
fn unit_variant_is_bare_tag() {
    assert_eq!(serde_json::to_string(&Request::GetQuerySchema).unwrap(), r#"{"type":"GetQuerySchema"}"#);
}

#[test]
fn run_query_runtime_defaults_to_null() {
    let json = r#"{"type":"RunQuery","provider":{"type":"x","name":"default"},"query_name":"q","body":{}}"#;
    let Request::RunQuery { runtime, provider, .. } = serde_json::from_str(json).unwrap() else {
        panic!("expected RunQuery");
    };
    assert_eq!(runtime, serde_json::Value::Null);
    assert_eq!(provider.params, serde_json::Value::Null);
}
