// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use prepalert_expr::Value;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn no_dependencies_renders_once() {
    let h = setup();
    h.execute(rule("ok"), &event()).await.unwrap();
    assert_eq!(h.memo(), "## Prepalert\nok");
    assert_eq!(h.alerts.memo_updates().len(), 1);
}

#[tokio::test]
async fn single_query_success_renders_table() {
    let h = setup();
    let result = simple_result("q", &["a", "b"], &[&["1", "2"]]);
    h.provider.respond("q", Ok(result.clone()));
    let r = h.with_query(rule("${result_to_table(query.command.q.result)}"), "q");

    h.execute(r, &event()).await.unwrap();
    assert_eq!(h.memo(), format!("## Prepalert\n{}", result.to_table()));
}

#[tokio::test]
async fn query_failure_renders_placeholder() {
    let h = setup();
    h.provider.respond("q", Err(QueryError::Failed("boom".to_string())));
    let r = h.with_query(rule("${result_to_table(query.command.q.result)}"), "q");

    h.execute(r, &event()).await.unwrap();
    assert!(h.memo().ends_with("[query \"command.q\" failed: boom]"), "{}", h.memo());
}

#[tokio::test]
async fn two_queries_write_once_per_completion() {
    let h = setup();
    let a = simple_result("a", &["x"], &[&["1"]]);
    let b = simple_result("b", &["y"], &[&["2"]]);
    h.provider.respond("a", Ok(a.clone()));
    h.provider.respond("b", Ok(b.clone()));
    h.provider.delay("b", Duration::from_millis(50));
    let r = h.with_query(
        h.with_query(rule("${result_to_table(query.command.a)}\n${result_to_table(query.command.b)}"), "a"),
        "b",
    );

    h.execute(r, &event()).await.unwrap();

    let updates = h.alerts.memo_updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0], format!("## Prepalert\n{}\n[query \"command.b\" running]", a.to_table()));
    assert_eq!(updates[1], format!("## Prepalert\n{}\n{}", a.to_table(), b.to_table()));
    assert_eq!(h.memo(), updates[1]);
}

#[tokio::test]
async fn existing_memo_sections_are_kept() {
    let h = setup();
    h.alerts.set_memo(ALERT, "human notes\n\n## Prepalert\nOLD\n\n## Other\nx");
    h.execute(rule("NEW"), &event()).await.unwrap();
    assert_eq!(h.memo(), "human notes\n\n## Prepalert\nNEW\n\n## Other\nx");
}

#[tokio::test]
async fn oversize_memo_is_capped() {
    let h = setup();
    let r = rule("${runtime.params.big}").with_params(Value::from_json(json!({"big": "x".repeat(100_000)})));
    h.execute(r, &event()).await.unwrap();
    let memo = h.memo();
    assert_eq!(memo.len(), 80_000);
    assert!(memo.ends_with("\n..."));
}

#[tokio::test]
async fn runtime_bindings_are_visible() {
    let h = setup();
    let r = rule("${runtime.event.alert.id} ${runtime.event.alert.monitor_name} ${runtime.params.limit}")
        .with_params(Value::from_json(json!({"limit": 10})));
    h.execute(r, &event()).await.unwrap();
    assert_eq!(h.memo(), format!("## Prepalert\n{ALERT} M 10"));
}

#[tokio::test]
async fn base_scope_bindings_are_visible() {
    let h = setup();
    let r = Arc::new(rule("${provider.command.default.shell}"));
    let writeback = h.writeback(&event(), &r);
    let base = Scope::with_stdlib().bind("provider.command.default", Value::from_json(json!({"shell": "bash"})));
    execute(&h.ctx, &r, &event(), &base, &writeback, &QueryLocks::new()).await.unwrap();
    assert_eq!(h.memo(), "## Prepalert\nbash");
}

#[tokio::test]
async fn each_query_runs_once_and_renders_once() {
    let h = setup();
    let mut r = rule("%{ for q in [query.command.a, query.command.b, query.command.c] }${q.status} %{ endfor }");
    for name in ["a", "b", "c"] {
        r = h.with_query(r, name);
    }
    h.execute(r, &event()).await.unwrap();

    let mut runs = h.provider.runs();
    runs.sort();
    assert_eq!(runs, vec!["a", "b", "c"]);
    assert_eq!(h.alerts.memo_updates().len(), 3);
    assert_eq!(h.memo(), "## Prepalert\nsuccess success success");
}

#[tokio::test]
async fn later_render_recovers_from_earlier_failure() {
    let h = setup();
    h.provider.respond("b", Ok(simple_result("b", &["v"], &[&["42"]])));
    h.provider.delay("b", Duration::from_millis(50));
    // fails while b is running: its result has no rows yet
    let r = h.with_query(h.with_query(rule("${query.command.b.result.rows[0][0]}"), "a"), "b");

    h.execute(r, &event()).await.unwrap();
    assert_eq!(h.memo(), "## Prepalert\n42");
    assert_eq!(h.alerts.memo_updates().len(), 1);
}
