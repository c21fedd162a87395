// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `prepalert validate`

use crate::prelude::*;

const CONFIG: &str = r#"
provider "command" {}

query "command" "uptime" {
  command = "echo '{\"load\": 0.5}'"
}

rule "load" {
  alert {
    monitor_name = "Load average"
  }
  information = "${result_to_table(query.command.uptime)}"
}
"#;

#[test]
fn valid_configuration_reports_counts() {
    let project = Project::empty();
    project.file("prepalert.hcl", CONFIG);
    project.prepalert().args(&["validate"]).passes().stdout_eq("config ok: 1 rules, 1 queries\n");
}

#[test]
fn config_flag_overrides_environment() {
    let project = Project::empty();
    let path = project.file("conf/main.hcl", CONFIG);
    cli().args(&["validate", "--config", path.to_str().unwrap()]).passes().stdout_has("config ok");
}

#[test]
fn undefined_query_reference_exits_with_config_code() {
    let project = Project::empty();
    project.file(
        "prepalert.hcl",
        r#"
rule "broken" {
  alert {
    any = true
  }
  information = "${query.command.missing.status}"
}
"#,
    );
    project.prepalert().args(&["validate"]).exits_with(2).stderr_has("invalid configuration");
}

#[test]
fn unknown_provider_type_exits_with_config_code() {
    let project = Project::empty();
    project.file("prepalert.hcl", "provider \"nope\" {}\n");
    project
        .prepalert()
        .args(&["validate"])
        .exits_with(2)
        .stderr_has("provider.nope.default")
        .stderr_has("unknown provider type");
}

#[test]
fn missing_configuration_exits_with_config_code() {
    let project = Project::empty();
    project.prepalert().args(&["validate"]).exits_with(2).stderr_has("no .hcl files");
}
