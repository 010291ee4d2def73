//! End-to-end export: mock API in, CSV out.

use std::sync::Arc;
use std::time::Duration;

use crate::common::{MockApi, empty_page, vocab_page};
use bunpro_export_core::csv_writer::{to_csv_string, write_to_path};
use bunpro_export_core::{Exporter, ProficiencyLevel};

fn exporter(api: &MockApi) -> Exporter {
    Exporter::new(Arc::new(api.client())).with_page_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_full_export_to_csv() {
    let api = MockApi::start().await;
    api.page(
        ProficiencyLevel::Beginner,
        1,
        vocab_page(&[(1, "食べる", "to eat"), (2, "飲む", "to drink")]),
    )
    .await;
    api.page(
        ProficiencyLevel::Beginner,
        2,
        vocab_page(&[(3, "言う", "to say \"hello\"")]),
    )
    .await;
    api.page(
        ProficiencyLevel::Expert,
        1,
        vocab_page(&[(1, "食べる", "to eat"), (4, "見る", "to see")]),
    )
    .await;

    let summary = exporter(&api).run().await.unwrap();

    assert_eq!(summary.total(), 4);
    assert_eq!(summary.pages_fetched(), 3);
    assert_eq!(
        to_csv_string(&summary.vocab).unwrap(),
        "\"word\",\"description\",\"progress\"\n\
         \"食べる\",\"to eat\",\"Beginner\"\n\
         \"飲む\",\"to drink\",\"Beginner\"\n\
         \"言う\",\"to say \"\"hello\"\"\",\"Beginner\"\n\
         \"見る\",\"to see\",\"Expert\"\n"
    );
}

#[tokio::test]
async fn test_empty_page_stops_level() {
    let api = MockApi::start().await;
    api.page(ProficiencyLevel::Adept, 1, vocab_page(&[(1, "猫", "cat")]))
        .await;
    api.page(ProficiencyLevel::Adept, 2, empty_page()).await;
    api.page(ProficiencyLevel::Adept, 3, vocab_page(&[(2, "犬", "dog")]))
        .await;

    let summary = exporter(&api)
        .with_levels(vec![ProficiencyLevel::Adept])
        .run()
        .await
        .unwrap();

    assert_eq!(summary.total(), 1);
    assert_eq!(summary.per_level[0].pages, 1);
}

#[tokio::test]
async fn test_forbidden_aborts_export() {
    let api = MockApi::start().await;
    api.page(ProficiencyLevel::Beginner, 1, vocab_page(&[(1, "猫", "cat")]))
        .await;
    api.status(ProficiencyLevel::Seasoned, 1, 403).await;

    let err = exporter(&api).run().await.unwrap_err();

    assert_eq!(err.to_string(), "Seasoned HTTP 403 on page 1");
    let requests = api.server.received_requests().await.unwrap();
    assert!(
        requests
            .iter()
            .all(|r| !r.url.query().unwrap_or_default().contains("level=expert"))
    );
}

#[tokio::test]
async fn test_export_written_to_disk() {
    let api = MockApi::start().await;
    api.page(ProficiencyLevel::Master, 1, vocab_page(&[(5, "水", "water")]))
        .await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");

    let summary = exporter(&api).run().await.unwrap();
    write_to_path(&summary.vocab, &path).unwrap();

    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        csv,
        "\"word\",\"description\",\"progress\"\n\"水\",\"water\",\"Master\"\n"
    );
}
