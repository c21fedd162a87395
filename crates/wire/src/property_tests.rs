// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for protocol serde roundtrips and framing.

use prepalert_core::test_support::simple_result;
use prepalert_core::ProviderParameter;
use proptest::prelude::*;

use super::*;

fn s() -> String {
    String::new()
}

fn provider() -> ProviderParameter {
    ProviderParameter::new("athena", "default", serde_json::json!({}))
}

fn all_requests() -> Vec<Request> {
    vec![
        Request::Handshake { protocol_version: PROTOCOL_VERSION },
        Request::ValidateProviderParameter { provider: provider() },
        Request::GetQuerySchema,
        Request::RunQuery {
            provider: provider(),
            query_name: s(),
            body: serde_json::Value::Null,
            runtime: serde_json::Value::Null,
        },
    ]
}

fn all_responses() -> Vec<Response> {
    vec![
        Response::Hello { name: s(), protocol_version: PROTOCOL_VERSION },
        Response::Ok,
        Response::QuerySchema { attributes: vec![SchemaAttribute::required("sql")] },
        Response::KeepAlive { extend_secs: 0 },
        Response::QueryResult { result: simple_result("q", &["a"], &[&["1"]]) },
        Response::Error { message: s() },
    ]
}

proptest! {
    #[test]
    fn request_serde_roundtrip(req in proptest::sample::select(all_requests())) {
        let encoded = encode(&req).expect("encode");
        let decoded: Request = decode(&encoded).expect("decode");
        prop_assert_eq!(decoded, req);
    }

    #[test]
    fn response_serde_roundtrip(resp in proptest::sample::select(all_responses())) {
        let encoded = encode(&resp).expect("encode");
        let decoded: Response = decode(&encoded).expect("decode");
        prop_assert_eq!(decoded, resp);
    }

    #[test]
    fn error_messages_survive_framing(message in ".*") {
        let rt = tokio::runtime::Builder::new_current_thread().build().expect("runtime");
        let decoded = rt.block_on(async {
            let mut buffer = Vec::new();
            write_response(&mut buffer, &Response::Error { message: message.clone() }).await?;
            Ok::<_, ProtocolError>(read_response(&mut std::io::Cursor::new(buffer)).await?)
        }).expect("roundtrip");
        prop_assert_eq!(decoded, Response::Error { message });
    }
}
