// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn plain(text: &str) -> String {
    text.to_string()
}

fn annotation(description: &str) -> GraphAnnotation {
    GraphAnnotation {
        id: None,
        title: "prepalert alert_id=A".to_string(),
        description: description.to_string(),
        from: 100,
        to: 200,
        service: "prod".to_string(),
        roles: Vec::new(),
    }
}

#[tokio::test]
async fn memo_reads_back_seeded_text() {
    let service = DryRunAlertService::new();
    service.seed_memo("A", "from webhook");
    assert_eq!(service.get_alert_memo("A").await.unwrap(), "from webhook");
    assert_eq!(service.get_alert_memo("B").await.unwrap(), "");

    service.update_alert_memo("A", "## Prepalert\nx").await.unwrap();
    assert_eq!(service.memo("A").as_deref(), Some("## Prepalert\nx"));
}

#[tokio::test]
async fn annotations_are_created_then_updated() {
    let service = DryRunAlertService::new();
    let created = service.create_graph_annotation(&annotation("first")).await.unwrap();
    let id = created.id.unwrap();

    let found = service.find_graph_annotations("prod", 0, 150).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(service.find_graph_annotations("prod", 300, 400).await.unwrap().is_empty());
    assert!(service.find_graph_annotations("dev", 0, 150).await.unwrap().is_empty());

    service.update_graph_annotation(&id, &annotation("second")).await.unwrap();
    let all = service.annotations();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "second");
    assert_eq!(all[0].id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn report_lists_memo_and_annotations() {
    let service = DryRunAlertService::new();
    service.update_alert_memo("A", "## Prepalert\nok").await.unwrap();
    service.create_graph_annotation(&annotation("note")).await.unwrap();

    assert_eq!(
        service.report("A", plain),
        "memo of alert A (1 writes)\n## Prepalert\nok\n\n\
         graph annotation on prod [100..200] prepalert alert_id=A\nnote\n"
    );
}

#[test]
fn report_without_writes() {
    assert_eq!(DryRunAlertService::new().report("A", plain), "nothing written\n");
}
