// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `prepalert exec`

use crate::prelude::*;

const CONFIG: &str = r#"
provider "command" {}

query "command" "greeting" {
  command = "echo '{\"greeting\": \"hello\"}'"
}

rule "greet" {
  alert {
    monitor_name = "Error rate"
  }
  information = <<EOT
alert ${runtime.event.alert.id}
${result_to_table(query.command.greeting)}
EOT
}
"#;

#[test]
fn dry_run_prints_the_memo() {
    let project = Project::empty();
    project.file("prepalert.hcl", CONFIG);
    let event = project.file("event.json", &closed_event("2bj6bp5ZDBa", "Error rate"));

    project
        .prepalert()
        .args(&["exec", event.to_str().unwrap(), "--dry-run"])
        .passes()
        .stdout_has("memo of alert 2bj6bp5ZDBa")
        .stdout_has("## Prepalert\nalert 2bj6bp5ZDBa")
        .stdout_has("greeting")
        .stdout_has("hello");
}

#[test]
fn event_can_come_from_stdin() {
    let project = Project::empty();
    project.file("prepalert.hcl", CONFIG);

    project
        .prepalert()
        .args(&["exec", "-", "--dry-run"])
        .stdin(&closed_event("2bj6bp5ZDBa", "Error rate"))
        .passes()
        .stdout_has("## Prepalert");
}

#[test]
fn unmatched_event_writes_nothing() {
    let project = Project::empty();
    project.file("prepalert.hcl", CONFIG);
    let event = project.file("event.json", &closed_event("2bj6bp5ZDBa", "Other monitor"));

    project.prepalert().args(&["exec", event.to_str().unwrap(), "--dry-run"]).passes().stdout_eq("nothing written\n");
}

#[test]
fn failing_command_is_rendered_not_fatal() {
    let project = Project::empty();
    project.file(
        "prepalert.hcl",
        r#"
provider "command" {}

query "command" "broken" {
  command = "echo 'no such table' >&2; exit 3"
}

rule "r" {
  alert {
    any = true
  }
  information = "${result_to_table(query.command.broken)}"
}
"#,
    );
    let event = project.file("event.json", &closed_event("2bj6bp5ZDBa", "M"));

    project
        .prepalert()
        .args(&["exec", event.to_str().unwrap(), "--dry-run"])
        .passes()
        .stdout_has("[query \"command.broken\" failed: no such table]");
}

#[test]
fn api_key_is_required_without_dry_run() {
    let project = Project::empty();
    project.file("prepalert.hcl", CONFIG);
    let event = project.file("event.json", &closed_event("2bj6bp5ZDBa", "Error rate"));

    project.prepalert().args(&["exec", event.to_str().unwrap()]).exits_with(2).stderr_has("MACKEREL_APIKEY");
}

#[test]
fn invalid_event_exits_with_one() {
    let project = Project::empty();
    project.file("prepalert.hcl", CONFIG);
    let event = project.file("event.json", "not json");

    project.prepalert().args(&["exec", event.to_str().unwrap(), "--dry-run"]).exits_with(1).stderr_has("invalid webhook event");
}

#[test]
fn json_logs_go_to_stderr() {
    let project = Project::empty();
    project.file("prepalert.hcl", CONFIG);
    let event = project.file("event.json", &closed_event("2bj6bp5ZDBa", "Error rate"));

    let outcome = project
        .prepalert()
        .args(&["--log-format", "json", "exec", event.to_str().unwrap(), "--dry-run"])
        .passes()
        .stderr_has("\"message\":\"executing rule\"");
    assert!(!outcome.stdout.contains("executing rule"), "{outcome}");
}
