//! Shared helpers for integration tests: a mock Bunpro API and page builders.

use bunpro_export_core::api::SRS_LEVEL_DETAILS_PATH;
use bunpro_export_core::token::normalize;
use bunpro_export_core::{ApiClient, AuthToken, ProficiencyLevel};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Token every mock expects.
pub const TEST_TOKEN: &str = "test-token-123";

/// Matches requests whose `_` query parameter is a unix timestamp in millis.
pub struct CacheBuster;

impl Match for CacheBuster {
    fn matches(&self, request: &Request) -> bool {
        request
            .url
            .query_pairs()
            .find(|(key, _)| key == "_")
            .and_then(|(_, value)| value.parse::<i64>().ok())
            .is_some_and(|millis| millis > 1_600_000_000_000)
    }
}

/// Test harness wrapping a running mock API.
pub struct MockApi {
    /// The underlying mock server
    pub server: MockServer,
}

impl MockApi {
    /// Starts a mock API where every unscripted request gets the
    /// end-of-data status.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(u8::MAX)
            .mount(&server)
            .await;
        Self { server }
    }

    /// Serves `body` for `page` of `level`.
    pub async fn page(&self, level: ProficiencyLevel, page: u32, body: Value) {
        Mock::given(method("GET"))
            .and(path(SRS_LEVEL_DETAILS_PATH))
            .and(query_param("level", level.api_name()))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answers `page` of `level` with `status` and no body.
    pub async fn status(&self, level: ProficiencyLevel, page: u32, status: u16) {
        Mock::given(method("GET"))
            .and(path(SRS_LEVEL_DETAILS_PATH))
            .and(query_param("level", level.api_name()))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// A client pointed at this mock.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.server.uri(), token()).unwrap()
    }
}

/// The token the client authenticates with.
pub fn token() -> AuthToken {
    normalize(TEST_TOKEN).unwrap()
}

/// A page containing `items` as `(id, title, meaning)` triples, each with a
/// matching review.
pub fn vocab_page(items: &[(u64, &str, &str)]) -> Value {
    let data: Vec<Value> = items
        .iter()
        .map(|(id, _, _)| json!({"type": "Review", "attributes": {"reviewable_id": id}}))
        .collect();
    let included: Vec<Value> = items
        .iter()
        .map(|(id, title, meaning)| {
            json!({
                "id": id.to_string(),
                "type": "Vocab",
                "attributes": {"title": title, "meaning": meaning}
            })
        })
        .collect();
    json!({"reviews": {"data": data, "included": included}})
}

/// A page with nothing in it.
pub fn empty_page() -> Value {
    json!({"reviews": {"data": [], "included": []}})
}
