// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{call, call_err};
use crate::DiagnosticKind;
use serde_json::json;
use serial_test::serial;

#[test]
#[serial]
fn env_reads_variable() {
    std::env::set_var("PREPALERT_TEST_ENV_VALUE", "hello");
    assert_eq!(call("env(\"PREPALERT_TEST_ENV_VALUE\")"), json!("hello"));
    assert_eq!(call("must_env(\"PREPALERT_TEST_ENV_VALUE\")"), json!("hello"));
    std::env::remove_var("PREPALERT_TEST_ENV_VALUE");
}

#[test]
#[serial]
fn env_missing_uses_default() {
    std::env::remove_var("PREPALERT_TEST_ENV_MISSING");
    assert_eq!(call("env(\"PREPALERT_TEST_ENV_MISSING\")"), json!(""));
    assert_eq!(call("env(\"PREPALERT_TEST_ENV_MISSING\", \"dflt\")"), json!("dflt"));
}

#[test]
#[serial]
fn must_env_missing_is_diagnostic() {
    std::env::remove_var("PREPALERT_TEST_ENV_MISSING");
    let err = call_err("must_env(\"PREPALERT_TEST_ENV_MISSING\")");
    assert_eq!(err.kind, DiagnosticKind::Function);
    assert!(err.detail.contains("PREPALERT_TEST_ENV_MISSING"), "{}", err.detail);
}
