//! HTTP client behavior against the mock API.

use crate::common::{CacheBuster, MockApi, TEST_TOKEN, vocab_page};
use bunpro_export_core::api::SRS_LEVEL_DETAILS_PATH;
use bunpro_export_core::client::PageSource;
use bunpro_export_core::{Error, PageOutcome, ProficiencyLevel};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_request_carries_auth_and_query() {
    let api = MockApi::start().await;
    Mock::given(method("GET"))
        .and(path(SRS_LEVEL_DETAILS_PATH))
        .and(query_param("reviewable_type", "Vocab"))
        .and(query_param("level", "seasoned"))
        .and(query_param("page", "3"))
        .and(CacheBuster)
        .and(header("authorization", format!("Token token={TEST_TOKEN}").as_str()))
        .and(header("accept", "application/json"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .and(header("cache-control", "no-cache"))
        .and(header("pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vocab_page(&[(1, "猫", "cat")])))
        .expect(1)
        .mount(&api.server)
        .await;

    let outcome = api
        .client()
        .fetch_page(ProficiencyLevel::Seasoned, 3)
        .await
        .unwrap();

    let PageOutcome::Page(page) = outcome else {
        unreachable!("expected a page");
    };
    assert_eq!(page.reviews.included[0].attributes.title, "猫");
}

#[tokio::test]
async fn test_reviewable_type_override() {
    let api = MockApi::start().await;
    Mock::given(method("GET"))
        .and(query_param("reviewable_type", "Grammar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vocab_page(&[])))
        .expect(1)
        .mount(&api.server)
        .await;

    let client = api.client().with_reviewable_type("Grammar");
    let outcome = client
        .fetch_page(ProficiencyLevel::Beginner, 1)
        .await
        .unwrap();
    assert!(matches!(outcome, PageOutcome::Page(p) if p.is_empty()));
}

#[tokio::test]
async fn test_status_500_is_end_of_data() {
    let api = MockApi::start().await;
    let outcome = api
        .client()
        .fetch_page(ProficiencyLevel::Expert, 7)
        .await
        .unwrap();
    assert!(matches!(outcome, PageOutcome::End));
}

#[tokio::test]
async fn test_other_status_is_error() {
    let api = MockApi::start().await;
    api.status(ProficiencyLevel::Adept, 2, 401).await;

    let err = api
        .client()
        .fetch_page(ProficiencyLevel::Adept, 2)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Adept HTTP 401 on page 2");
    assert!(err.is_user_actionable());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let api = MockApi::start().await;
    Mock::given(method("GET"))
        .and(query_param("level", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&api.server)
        .await;

    let err = api
        .client()
        .fetch_page(ProficiencyLevel::Master, 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Decode {
            level: ProficiencyLevel::Master,
            page: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn test_cache_buster_is_unix_millis() {
    let api = MockApi::start().await;
    Mock::given(method("GET"))
        .and(query_param("level", "adept"))
        .and(CacheBuster)
        .respond_with(ResponseTemplate::new(200).set_body_json(vocab_page(&[(1, "猫", "cat")])))
        .expect(2)
        .mount(&api.server)
        .await;

    let client = api.client();
    for page in 1..=2 {
        let outcome = client
            .fetch_page(ProficiencyLevel::Adept, page)
            .await
            .unwrap();
        assert!(matches!(outcome, PageOutcome::Page(p) if !p.is_empty()));
    }
}
