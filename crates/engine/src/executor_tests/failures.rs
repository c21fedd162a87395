// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

struct CrashingQuery;

#[async_trait::async_trait]
impl Query for CrashingQuery {
    fn name(&self) -> &str {
        "crash"
    }

    async fn run(&self, _ctx: &QueryContext, _scope: &Scope) -> Result<QueryResult, QueryError> {
        panic!("query blew up");
    }
}

#[tokio::test]
async fn timeout_is_a_logical_failure() {
    let h = setup();
    h.provider.delay("slow", Duration::from_secs(30));
    let r = h
        .with_query(rule("${result_to_table(query.command.slow)}"), "slow")
        .with_query_timeout(Duration::from_millis(50));

    tokio::time::timeout(Duration::from_secs(5), h.execute(r, &event())).await.unwrap().unwrap();
    assert_eq!(h.memo(), "## Prepalert\n[query \"command.slow\" failed: timed out after 50ms]");
}

#[tokio::test]
async fn transport_failure_is_fatal_but_still_rendered() {
    let h = setup();
    h.provider.respond("q", Err(QueryError::Transport("pipe closed".to_string())));
    let r = h.with_query(rule("${result_to_table(query.command.q)}"), "q");

    let err = h.execute(r, &event()).await.unwrap_err();
    match err {
        ExecuteError::Transport(messages) => assert_eq!(messages, vec!["command.q: pipe closed"]),
        other => panic!("expected transport error, got {other}"),
    }
    assert_eq!(h.memo(), "## Prepalert\n[query \"command.q\" failed: pipe closed]");
}

#[tokio::test]
async fn cancellation_marks_running_queries() {
    let h = setup();
    h.provider.respond("fast", Ok(simple_result("fast", &["n"], &[&["1"]])));
    h.provider.hang("slow");
    let r = h.with_query(
        h.with_query(rule("${result_to_table(query.command.fast)}|${result_to_table(query.command.slow)}"), "fast"),
        "slow",
    );

    let token = h.ctx.cancel_token().clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });
    let err = tokio::time::timeout(Duration::from_secs(5), h.execute(r, &event())).await.unwrap().unwrap_err();
    assert!(matches!(err, ExecuteError::Cancelled), "{err}");
    assert!(h.memo().ends_with("|[query \"command.slow\" failed: cancelled]"), "{}", h.memo());
}

#[tokio::test]
async fn every_render_failing_is_an_error() {
    let h = setup();
    let r = h.with_query(rule("${upper(query.command.q)}"), "q");
    let err = h.execute(r, &event()).await.unwrap_err();
    assert!(matches!(err, ExecuteError::Render(_)), "{err}");
    assert!(h.alerts.memo_updates().is_empty());
}

#[tokio::test]
async fn render_failure_without_queries_is_an_error() {
    let h = setup();
    let err = h.execute(rule("${runtime.event.alert.nope}"), &event()).await.unwrap_err();
    assert!(matches!(err, ExecuteError::Render(ref m) if m.contains("nope")), "{err}");
}

#[tokio::test]
async fn writeback_failure_is_reported() {
    let h = setup();
    h.alerts.fail_memo_updates(503);
    let r = h.with_query(rule("${query.command.q.status}"), "q");
    let err = h.execute(r, &event()).await.unwrap_err();
    assert!(matches!(err, ExecuteError::Writeback(_)), "{err}");
}

#[tokio::test]
async fn writeback_failure_without_queries_is_reported() {
    let h = setup();
    h.alerts.fail_memo_updates(503);
    let err = h.execute(rule("ok"), &event()).await.unwrap_err();
    assert!(matches!(err, ExecuteError::Writeback(_)), "{err}");
}

#[tokio::test]
async fn crashed_query_task_is_marked_failed() {
    let h = setup();
    h.provider.respond("ok", Ok(simple_result("ok", &["n"], &[&["1"]])));
    let r = h
        .with_query(rule("${query.command.ok.status} ${result_to_table(query.command.crash)}"), "ok")
        .with_query("command.crash".to_string(), Arc::new(CrashingQuery));

    let err = h.execute(r, &event()).await.unwrap_err();
    match err {
        ExecuteError::Transport(messages) => {
            assert_eq!(messages.len(), 1);
            assert!(messages[0].starts_with("query task failed"), "{messages:?}");
        }
        other => panic!("expected transport error, got {other}"),
    }
    assert_eq!(h.memo(), "## Prepalert\nsuccess [query \"command.crash\" failed: query task failed]");
}
