// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::provider::FakeProvider;
use crate::writeback::{SectionSpec, WritebackDeps};
use prepalert_adapters::{DisabledBackend, FakeAlertService};
use prepalert_core::test_support::{open_alert_event, simple_result};
use prepalert_core::FakeClock;
use prepalert_expr::Template;

mod failures;
mod scenarios;

const ALERT: &str = "2bj6bp5ZDBa";

struct Harness {
    alerts: FakeAlertService,
    provider: FakeProvider,
    ctx: QueryContext,
}

fn setup() -> Harness {
    Harness { alerts: FakeAlertService::new(), provider: FakeProvider::new(), ctx: QueryContext::detached() }
}

fn rule(information: &str) -> Rule {
    Rule::new("r", Template::parse(information).unwrap())
}

fn event() -> AlertEvent {
    open_alert_event(ALERT, "M")
}

impl Harness {
    /// Add `command.<name>` backed by the fake provider.
    fn with_query(&self, rule: Rule, name: &str) -> Rule {
        rule.with_query(format!("command.{name}"), self.provider.query(name))
    }

    fn writeback(&self, event: &AlertEvent, rule: &Rule) -> Arc<Writeback> {
        let deps = WritebackDeps::new(
            Arc::new(self.alerts.clone()),
            Arc::new(DisabledBackend),
            Arc::new(FakeClock::default()),
        );
        Arc::new(Writeback::new(deps, event, Scope::new(), vec![SectionSpec::for_rule(rule)]))
    }

    async fn execute(&self, rule: Rule, event: &AlertEvent) -> Result<(), ExecuteError> {
        let rule = Arc::new(rule);
        let writeback = self.writeback(event, &rule);
        execute(&self.ctx, &rule, event, &Scope::with_stdlib(), &writeback, &QueryLocks::new()).await
    }

    fn memo(&self) -> String {
        self.alerts.memo(ALERT).unwrap_or_default()
    }
}

#[test]
fn query_objects_by_status() {
    let running = query_object("command.q", QueryStatus::Running).to_json();
    assert_eq!(
        running,
        serde_json::json!({
            "fqn": "command.q", "status": "running", "error": null,
            "result": {"fqn": "command.q", "status": "running", "error": null},
        })
    );

    let failed = query_object("command.q", QueryStatus::Failed("boom")).to_json();
    assert_eq!(failed["error"], "boom");
    assert_eq!(failed["result"]["error"], "boom");

    let result = simple_result("q", &["a"], &[&["1"]]);
    let success = query_object("command.q", QueryStatus::Success(&result)).to_json();
    assert_eq!(success["status"], "success");
    assert_eq!(success["result"]["columns"], serde_json::json!(["a"]));
    assert_eq!(success["result"]["rows"], serde_json::json!([["1"]]));
}
