// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::invalid;
use crate::{parse_config, ConfigError};

#[test]
fn duplicate_rule() {
    let (location, message) = invalid(
        r#"
rule "r" {
  alert { any = true }
  information = "a"
}
rule "r" {
  alert { any = true }
  information = "b"
}
"#,
    );
    assert_eq!(location, "rule.r");
    assert!(message.contains("duplicate rule"), "{message}");
}

#[test]
fn duplicate_query_fqn() {
    let (location, message) = invalid(
        r#"
provider "command" {}
query "command" "q" { command = "a" }
query "command" "q" { command = "b" }
"#,
    );
    assert_eq!(location, "query.command.q");
    assert!(message.contains("duplicate query"), "{message}");
}

#[test]
fn duplicate_query_name_across_types() {
    let (location, message) = invalid(
        r#"
provider "command" {}
query "command" "q" { command = "a" }
query "athena" "q" { sql = "select 1" }
"#,
    );
    assert_eq!(location, "query.athena.q");
    assert!(message.contains("already defined as command.q"), "{message}");
}

#[test]
fn duplicate_provider() {
    let (location, _) = invalid(
        r#"
provider "command" {}
provider "command" "default" {}
"#,
    );
    assert_eq!(location, "provider.command.default");
}

#[test]
fn duplicate_prepalert_block() {
    let (location, _) = invalid("prepalert {}\nprepalert {}\n");
    assert_eq!(location, "prepalert");
}

#[test]
fn query_with_undefined_provider() {
    let (location, message) = invalid(
        r#"
provider "command" {}
query "command" "q" {
  provider = "alt"
  command  = "true"
}
"#,
    );
    assert_eq!(location, "query.command.q.provider");
    assert!(message.contains("provider \"command.alt\" is not defined"), "{message}");
}

#[yare::parameterized(
    neither = { "alert { on_opened = true }" },
    both    = { "alert {\n any = true\n monitor_name = \"M\"\n}" },
)]
fn alert_block_must_pick_one_matcher(alert: &str) {
    let hcl = format!("rule \"r\" {{\n{alert}\ninformation = \"ok\"\n}}\n");
    let (location, _) = invalid(&hcl);
    assert_eq!(location, "rule.r.alert");
}

#[test]
fn template_parse_error_has_snippet() {
    let (location, message) = invalid(
        r#"
rule "r" {
  alert { any = true }
  information = "${ 1 + }"
}
"#,
    );
    assert_eq!(location, "rule.r.information");
    assert!(message.contains("--> line 1"), "{message}");
}

#[test]
fn unknown_function() {
    let (location, message) = invalid(
        r#"
rule "r" {
  alert { any = true }
  information = "${no_such_fn(1)}"
}
"#,
    );
    assert_eq!(location, "rule.r.information");
    assert!(message.contains("no_such_fn"), "{message}");
    assert!(message.contains("--> line 1, column 3"), "{message}");
}

#[test]
fn special_forms_are_known_functions() {
    parse_config(
        r#"
rule "r" {
  alert { any = true }
  information = "${try(runtime.event.alert.id, "none")} ${can(runtime.params.x)}"
}
"#,
    )
    .unwrap();
}

#[yare::parameterized(
    no_unit  = { "15" },
    bad_unit = { "1d" },
)]
fn invalid_duration(value: &str) {
    let (location, _) = invalid(&format!("prepalert {{ query_timeout = \"{value}\" }}\n"));
    assert_eq!(location, "prepalert.query_timeout");
}

#[test]
fn annotation_requires_service() {
    let (location, _) = invalid(
        r#"
rule "r" {
  alert { any = true }
  information = "ok"
  post_graph_annotation = true
}
"#,
    );
    assert_eq!(location, "rule.r.post_graph_annotation");
}

#[test]
fn unknown_block_type() {
    let (location, message) = invalid("webhook \"x\" {}\n");
    assert_eq!(location, "webhook");
    assert!(message.contains("unknown block type"), "{message}");
}

#[test]
fn unknown_rule_attribute() {
    let (location, message) = invalid(
        r#"
rule "r" {
  alert { any = true }
  information = "ok"
  colour = "red"
}
"#,
    );
    assert_eq!(location, "rule.r");
    assert!(message.contains("colour"), "{message}");
}

#[test]
fn unsupported_backend() {
    let (location, _) = invalid("prepalert {\n  backend \"s3\" {\n    bucket = \"x\"\n  }\n}\n");
    assert_eq!(location, "prepalert.backend.s3");
}

#[yare::parameterized(
    query_one_label = { "query \"command\" {}" },
    rule_no_label   = { "rule {}" },
    provider_three  = { "provider \"a\" \"b\" \"c\" {}" },
)]
fn wrong_label_count(hcl: &str) {
    assert!(matches!(parse_config(hcl), Err(ConfigError::Invalid { .. })));
}

#[test]
fn syntax_error_names_origin() {
    let err = parse_config("rule \"r\" {").unwrap_err();
    assert!(matches!(err, ConfigError::Syntax { .. }), "{err}");
    assert!(err.to_string().starts_with("<inline>"), "{err}");
}

#[test]
fn top_level_attribute_rejected() {
    let (location, _) = invalid("service = \"prod\"\n");
    assert_eq!(location, "service");
}
