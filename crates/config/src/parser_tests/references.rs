// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{invalid, parse};

const QUERIES: &str = r#"
provider "command" {}
query "command" "a" { command = "true" }
query "command" "b" { command = "true" }
query "command" "c" { command = "true" }
"#;

fn with_queries(rule: &str) -> String {
    format!("{QUERIES}\n{rule}")
}

#[test]
fn refs_deduplicate_in_first_reference_order() {
    let config = parse(&with_queries(
        r#"
rule "r" {
  alert { any = true }
  information = "${query.command.b.status} ${result_to_table(query.command.a)} ${query.command.b.error}"
}
"#,
    ));
    assert_eq!(config.rules[0].query_refs, vec!["command.b", "command.a"]);
}

#[test]
fn explicit_queries_are_unioned() {
    let config = parse(&with_queries(
        r#"
rule "r" {
  alert { any = true }
  queries     = ["command.c", "command.a"]
  information = "${query.command.a.status}"
}
"#,
    ));
    assert_eq!(config.rules[0].query_refs, vec!["command.a", "command.c"]);
}

#[test]
fn refs_inside_directives_are_found() {
    let config = parse(&with_queries(
        r#"
rule "r" {
  alert { any = true }
  information = "%{ if can(query.command.a.result) }${query.command.c.result.rows[0]}%{ endif }"
}
"#,
    ));
    assert_eq!(config.rules[0].query_refs, vec!["command.a", "command.c"]);
}

#[test]
fn undefined_reference_in_information() {
    let (location, message) = invalid(&with_queries(
        r#"
rule "r" {
  alert { any = true }
  information = "${result_to_table(query.command.missing)}"
}
"#,
    ));
    assert_eq!(location, "rule.r.information");
    assert!(message.contains("query \"command.missing\" is not defined"), "{message}");
}

#[test]
fn undefined_reference_in_queries_list() {
    let (location, message) = invalid(&with_queries(
        r#"
rule "r" {
  alert { any = true }
  queries     = ["command.nope"]
  information = "ok"
}
"#,
    ));
    assert_eq!(location, "rule.r.queries");
    assert!(message.contains("command.nope"), "{message}");
}

#[test]
fn malformed_queries_entry() {
    let (location, _) = invalid(
        r#"
rule "r" {
  alert { any = true }
  queries     = ["just_a_name"]
  information = "ok"
}
"#,
    );
    assert_eq!(location, "rule.r.queries");
}

#[test]
fn incomplete_query_reference() {
    let (location, message) = invalid(&with_queries(
        r#"
rule "r" {
  alert { any = true }
  information = "${jsonencode(query.command)}"
}
"#,
    ));
    assert_eq!(location, "rule.r.information");
    assert!(message.contains("query.<type>.<name>"), "{message}");
}
