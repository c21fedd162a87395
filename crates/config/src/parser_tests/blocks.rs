// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::parse;
use crate::{BackendDef, DEFAULT_QUERY_TIMEOUT};
use serde_json::json;
use std::time::Duration;

const FULL: &str = r#"
prepalert {
  service       = "prod"
  query_timeout = "5m"

  backend "local" {
    dir                 = "/var/lib/prepalert"
    base_url            = "https://files.example.com"
    object_key_template = "alerts/${runtime.event.alert.id}.md"
  }

  plugins {
    athena = { cmd = "prepalert-provider-athena", args = ["--quiet"] }
  }
}

provider "command" {
  shell = "bash"
}

provider "command" "alt" {
  dir = "/tmp"
}

query "command" "errors" {
  provider = "alt"
  command  = "grep -c ERROR /var/log/app.log"
}

query "command" "load" {
  command = "uptime"
}

rule "high_error_rate" {
  alert {
    monitor_name = "Error rate"
    on_opened    = true
  }
  params      = { limit = 10 }
  information = <<EOT
${result_to_table(query.command.errors)}
${result_to_table(query.command.load)}
EOT
  post_graph_annotation = true
  max_memo_size         = 2000
  max_graph_annotation_description_size = 200
}
"#;

#[test]
fn parses_full_configuration() {
    let config = parse(FULL);

    assert_eq!(config.prepalert.service.as_deref(), Some("prod"));
    assert_eq!(config.prepalert.query_timeout, Duration::from_secs(300));
    let BackendDef::Local(local) = &config.prepalert.backend else {
        panic!("expected local backend, got {:?}", config.prepalert.backend);
    };
    assert_eq!(local.dir.to_str(), Some("/var/lib/prepalert"));
    assert_eq!(local.base_url, "https://files.example.com");
    assert_eq!(
        local.object_key_template.as_ref().map(|t| t.source()),
        Some("alerts/${runtime.event.alert.id}.md")
    );
    let athena = &config.prepalert.plugins["athena"];
    assert_eq!(athena.cmd, "prepalert-provider-athena");
    assert_eq!(athena.args, vec!["--quiet"]);

    assert_eq!(config.providers.len(), 2);
    assert_eq!(config.providers[0].name, "default");
    assert_eq!(config.providers[0].params, json!({"shell": "bash"}));
    assert_eq!(config.providers[1].parameter().id(), "command.alt");

    let errors = config.query("command.errors").unwrap();
    assert_eq!(errors.provider, "alt");
    assert_eq!(errors.body, json!({"command": "grep -c ERROR /var/log/app.log"}));
    assert_eq!(config.query("command.load").unwrap().provider, "default");
}

#[test]
fn parses_rule_attributes() {
    let config = parse(FULL);
    let rule = &config.rules[0];

    assert_eq!(rule.name, "high_error_rate");
    assert_eq!(rule.alert.monitor_name.as_deref(), Some("Error rate"));
    assert!(rule.alert.on_opened);
    assert!(rule.alert.on_closed);
    assert_eq!(rule.params, json!({"limit": 10}));
    assert_eq!(rule.query_refs, vec!["command.errors", "command.load"]);
    assert!(rule.update_alert_memo);
    assert!(rule.post_graph_annotation);
    assert_eq!(rule.max_memo_size, Some(2000));
    assert_eq!(rule.max_annotation_description_size, Some(200));
    // inherited from the prepalert block
    assert_eq!(rule.service.as_deref(), Some("prod"));
}

#[test]
fn defaults_apply() {
    let config = parse(
        r#"
rule "any" {
  alert { any = true }
  information = "ok"
}
"#,
    );
    assert_eq!(config.prepalert.query_timeout, DEFAULT_QUERY_TIMEOUT);
    assert!(matches!(config.prepalert.backend, BackendDef::Disabled));

    let rule = &config.rules[0];
    assert!(rule.alert.any);
    assert!(!rule.alert.on_opened);
    assert!(rule.alert.on_closed);
    assert!(rule.update_alert_memo);
    assert!(!rule.post_graph_annotation);
    assert!(rule.query_refs.is_empty());
    assert_eq!(rule.params, json!({}));
    assert_eq!(rule.service, None);
}

#[test]
fn rule_service_overrides_default() {
    let config = parse(
        r#"
prepalert { service = "prod" }
rule "r" {
  alert { any = true }
  information = "ok"
  service = "staging"
}
"#,
    );
    assert_eq!(config.rules[0].service.as_deref(), Some("staging"));
}

#[test]
fn blocks_may_appear_in_any_order() {
    let config = parse(
        r#"
rule "r" {
  alert { any = true }
  information = "${query.command.q.status}"
  post_graph_annotation = true
}
query "command" "q" { command = "true" }
provider "command" {}
prepalert { service = "prod" }
"#,
    );
    assert_eq!(config.rules[0].query_refs, vec!["command.q"]);
    assert_eq!(config.rules[0].service.as_deref(), Some("prod"));
}

#[test]
fn rules_keep_declaration_order() {
    let config = parse(
        r#"
rule "b" {
  alert { any = true }
  information = "b"
}
rule "a" {
  alert { any = true }
  information = "a"
}
"#,
    );
    let names: Vec<_> = config.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
}
