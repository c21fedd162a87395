// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::plugin::test_plugin::DuplexLauncher;
use crate::plugin::Launcher;
use crate::provider::{FakeProvider, QueryError};
use prepalert_adapters::{DisabledBackend, FakeAlertService, FakeBackend};
use prepalert_config::parse_config;
use prepalert_core::test_support::{closed_alert_event, open_alert_event, simple_result};
use prepalert_core::FakeClock;

const ALERT: &str = "2bj6bp5ZDBa";

struct Harness {
    alerts: FakeAlertService,
    fake: FakeProvider,
}

fn setup() -> Harness {
    Harness { alerts: FakeAlertService::new(), fake: FakeProvider::new() }
}

impl Harness {
    fn registry(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::with_builtin();
        registry.register("fake", Arc::new(self.fake.clone())).unwrap();
        registry
    }

    fn deps(&self) -> WritebackDeps {
        WritebackDeps::new(Arc::new(self.alerts.clone()), Arc::new(DisabledBackend), Arc::new(FakeClock::default()))
    }

    async fn load(&self, hcl: &str) -> Result<Processor, LoadError> {
        let config = parse_config(hcl).unwrap();
        Processor::load_with_plugins(&config, self.registry(), PluginHost::default(), self.deps()).await
    }

    fn memo(&self) -> String {
        self.alerts.memo(ALERT).unwrap_or_default()
    }
}

const TWO_RULES: &str = r#"
provider "fake" {
  region = "ap-northeast-1"
}

query "fake" "errors" {
  statement = "SELECT 1"
}

rule "errors" {
  alert {
    monitor_name = "Error rate"
  }
  information = "${result_to_table(query.fake.errors)}"
}

rule "everything" {
  alert {
    any = true
  }
  information = "region ${provider.fake.default.region}"
}
"#;

#[tokio::test]
async fn load_compiles_providers_queries_and_rules() {
    let h = setup();
    let processor = h.load(TWO_RULES).await.unwrap();

    assert_eq!(processor.query_count(), 1);
    let names: Vec<&str> = processor.rules().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["errors", "everything"]);
    assert_eq!(processor.rules()[0].predicate, Predicate::MonitorName("Error rate".to_string()));
    assert_eq!(processor.rules()[1].predicate, Predicate::Any);
    assert_eq!(processor.rules()[0].query_fqns().collect::<Vec<_>>(), vec!["fake.errors"]);

    let built = h.fake.built();
    assert_eq!(built.len(), 1);
    assert_eq!(built[0].id(), "fake.default");
    assert_eq!(
        processor.base_scope().lookup_path("provider.fake.default.region").and_then(|v| v.as_str()),
        Some("ap-northeast-1")
    );
}

#[tokio::test]
async fn unknown_provider_type_fails_load() {
    let h = setup();
    let err = h.load("provider \"nope\" {}\n").await.unwrap_err();
    match err {
        LoadError::Provider { location, source } => {
            assert_eq!(location, "provider.nope.default");
            assert!(matches!(source, ProviderError::UnknownType(ref t) if t == "nope"), "{source}");
        }
        other => panic!("expected provider error, got {other}"),
    }
}

#[tokio::test]
async fn rejected_query_fails_load_with_location() {
    let h = setup();
    h.fake.reject("errors", "bad statement");
    let err = h.load(TWO_RULES).await.unwrap_err();
    assert_eq!(err.to_string(), "query.fake.errors: invalid query: bad statement");
}

#[tokio::test]
async fn process_runs_matching_rules_into_one_memo() {
    let h = setup();
    let result = simple_result("errors", &["count"], &[&["3"]]);
    h.fake.respond("errors", Ok(result.clone()));
    let processor = h.load(TWO_RULES).await.unwrap();

    let event = closed_alert_event(ALERT, "Error rate", 1_700_000_300);
    let ran = processor.process(&QueryContext::detached(), &event).await.unwrap();

    assert_eq!(ran, vec!["errors", "everything"]);
    assert_eq!(h.fake.runs(), vec!["errors"]);
    assert_eq!(h.memo(), format!("## Prepalert\n{}\n\nregion ap-northeast-1", result.to_table()));
}

#[tokio::test]
async fn process_skips_rules_that_do_not_match() {
    let h = setup();
    let processor = h.load(TWO_RULES).await.unwrap();

    // open alerts are off by default
    let event = open_alert_event(ALERT, "Error rate");
    assert_eq!(processor.matching_rules(&event), vec!["everything"]);
    let ran = processor.process(&QueryContext::detached(), &event).await.unwrap();

    assert_eq!(ran, vec!["everything"]);
    assert!(h.fake.runs().is_empty());
    assert_eq!(h.memo(), "## Prepalert\nregion ap-northeast-1");
}

#[tokio::test]
async fn no_matching_rule_touches_nothing() {
    let h = setup();
    let processor = h
        .load(
            r#"
rule "only" {
  alert {
    monitor_name = "Other"
  }
  information = "x"
}
"#,
        )
        .await
        .unwrap();

    let ran = processor
        .process(&QueryContext::detached(), &closed_alert_event(ALERT, "M", 1_700_000_300))
        .await
        .unwrap();
    assert!(ran.is_empty());
    assert!(h.alerts.calls().is_empty());
}

#[tokio::test]
async fn rules_sharing_a_query_run_it_one_at_a_time() {
    let h = setup();
    h.fake.respond("errors", Ok(simple_result("errors", &["count"], &[&["3"]])));
    h.fake.delay("errors", std::time::Duration::from_millis(100));
    let processor = h
        .load(
            r#"
provider "fake" {}

query "fake" "errors" {
  statement = "SELECT 1"
}

rule "first" {
  alert {
    any = true
  }
  information = "${result_to_table(query.fake.errors)}"
}

rule "second" {
  alert {
    any = true
  }
  information = "${result_to_table(query.fake.errors)}"
}
"#,
        )
        .await
        .unwrap();

    let event = closed_alert_event(ALERT, "M", 1_700_000_300);
    let ran = processor.process(&QueryContext::detached(), &event).await.unwrap();

    assert_eq!(ran, vec!["first", "second"]);
    assert_eq!(h.fake.runs(), vec!["errors", "errors"]);
    assert_eq!(h.fake.peak_concurrency(), 1);
}

#[tokio::test]
async fn failed_rules_are_aggregated() {
    let h = setup();
    h.fake.respond("errors", Err(QueryError::Transport("connection reset".to_string())));
    let processor = h.load(TWO_RULES).await.unwrap();

    let event = closed_alert_event(ALERT, "Error rate", 1_700_000_300);
    let err = processor.process(&QueryContext::detached(), &event).await.unwrap_err();

    assert_eq!(err.failures.len(), 1);
    assert_eq!(err.failures[0].0, "errors");
    assert!(!err.is_cancelled());
    assert!(err.to_string().contains("fake.errors: connection reset"), "{err}");
    // the other rule still wrote its section
    assert!(h.memo().ends_with("region ap-northeast-1"), "{}", h.memo());
}

#[tokio::test]
async fn cancelled_event_reports_cancellation() {
    let h = setup();
    h.fake.hang("errors");
    let processor = h.load(TWO_RULES).await.unwrap();

    let ctx = QueryContext::detached();
    let token = ctx.cancel_token().clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        token.cancel();
    });
    let event = closed_alert_event(ALERT, "Error rate", 1_700_000_300);
    let err = processor.process(&ctx, &event).await.unwrap_err();
    assert!(err.is_cancelled(), "{err}");
}

#[tokio::test]
async fn rule_settings_are_carried_over() {
    let h = setup();
    let processor = h
        .load(
            r#"
prepalert {
  service       = "prod"
  query_timeout = "30s"
}

rule "annotated" {
  alert {
    monitor_name = "M"
    on_opened    = true
    on_closed    = false
  }
  params                = { limit = 10 }
  information           = "x"
  update_alert_memo     = false
  post_graph_annotation = true
  max_memo_size         = 100
  max_graph_annotation_description_size = 50
}
"#,
        )
        .await
        .unwrap();

    let rule = &processor.rules()[0];
    assert!(rule.on_opened);
    assert!(!rule.on_closed);
    assert!(!rule.update_alert_memo);
    assert!(rule.post_graph_annotation);
    assert_eq!(rule.service.as_deref(), Some("prod"));
    assert_eq!(rule.max_memo_size, Some(100));
    assert_eq!(rule.max_annotation_description_size, Some(50));
    assert_eq!(rule.query_timeout, std::time::Duration::from_secs(30));
    assert_eq!(rule.params.to_json(), serde_json::json!({"limit": 10}));
}

#[tokio::test]
async fn annotation_only_rule_posts_annotation() {
    let h = setup();
    let processor = h
        .load(
            r#"
rule "annotated" {
  alert {
    any = true
  }
  information           = "graph note"
  update_alert_memo     = false
  post_graph_annotation = true
  service               = "prod"
}
"#,
        )
        .await
        .unwrap();

    let event = closed_alert_event(ALERT, "M", 1_700_000_300);
    processor.process(&QueryContext::detached(), &event).await.unwrap();

    assert!(h.alerts.memo_updates().is_empty());
    let annotations = h.alerts.annotations();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].description, "graph note");
    assert_eq!(annotations[0].service, "prod");
}

#[tokio::test]
async fn object_key_template_comes_from_backend_block() {
    let h = setup();
    let dir = tempfile::tempdir().unwrap();
    let hcl = format!(
        r#"
prepalert {{
  backend "local" {{
    dir                 = "{}"
    base_url            = "https://files.example.com"
    object_key_template = "memos/${{runtime.event.alert.monitor_name}}/${{runtime.event.alert.id}}.txt"
  }}
}}

rule "r" {{
  alert {{
    any = true
  }}
  information = "full text"
}}
"#,
        dir.path().display()
    );
    let config = parse_config(&hcl).unwrap();
    let backend = FakeBackend::new();
    let deps =
        WritebackDeps::new(Arc::new(h.alerts.clone()), Arc::new(backend.clone()), Arc::new(FakeClock::default()));
    let processor = Processor::load_with_plugins(&config, h.registry(), PluginHost::default(), deps).await.unwrap();

    let event = closed_alert_event(ALERT, "M", 1_700_000_300);
    processor.process(&QueryContext::detached(), &event).await.unwrap();

    let key = format!("memos/M/{ALERT}.txt");
    assert_eq!(backend.uploads(), vec![(key.clone(), "full text".to_string())]);
    assert_eq!(h.memo(), format!("## Prepalert\nFull Text URL: https://backend.test/{key}\n\nfull text"));
}

#[tokio::test]
async fn plugin_queries_run_through_the_bridge() {
    let h = setup();
    let launcher = DuplexLauncher::new();
    let plugins = PluginHost::with_launchers([(
        "warehouse".to_string(),
        Box::new(launcher.clone()) as Box<dyn Launcher>,
    )]);
    let config = parse_config(
        r#"
provider "warehouse" {}

query "warehouse" "logs" {
  statement = "SELECT * FROM logs LIMIT ${runtime.params.limit}"
}

rule "r" {
  alert {
    any = true
  }
  params      = { limit = 5 }
  information = "${result_to_jsonlines(query.warehouse.logs)}"
}
"#,
    )
    .unwrap();
    let processor = Processor::load_with_plugins(&config, h.registry(), plugins, h.deps()).await.unwrap();

    let event = closed_alert_event(ALERT, "M", 1_700_000_300);
    processor.process(&QueryContext::detached(), &event).await.unwrap();

    assert_eq!(launcher.launches(), 1);
    assert!(h.memo().contains("SELECT * FROM logs LIMIT 5"), "{}", h.memo());
    assert!(h.memo().contains(ALERT), "{}", h.memo());
    processor.shutdown().await;
}
