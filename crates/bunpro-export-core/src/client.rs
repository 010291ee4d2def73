//! HTTP access to the SRS level details endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, PRAGMA};

use crate::api::{SRS_LEVEL_DETAILS_PATH, SrsPage};
use crate::error::{Error, Result};
use crate::level::ProficiencyLevel;
use crate::token::AuthToken;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.bunpro.jp";

/// Reviewable type exported by default.
pub const DEFAULT_REVIEWABLE_TYPE: &str = "Vocab";

/// Status the API returns once a level has been paged past its end.
const END_OF_DATA_STATUS: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

/// Result of fetching one page.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// The server returned a page of data (possibly empty).
    Page(SrsPage),
    /// The server signalled there is nothing more for this level.
    End,
}

/// Source of paged SRS data.
///
/// [`ApiClient`] is the real implementation; tests substitute canned pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `page` (1-based) of `level`.
    async fn fetch_page(&self, level: ProficiencyLevel, page: u32) -> Result<PageOutcome>;
}

/// Authenticated client for the Bunpro frontend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    reviewable_type: String,
    token: AuthToken,
}

impl ApiClient {
    /// Creates a client for `base_url` authenticating with `token`.
    pub fn new(base_url: impl Into<String>, token: AuthToken) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bunpro-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            reviewable_type: DEFAULT_REVIEWABLE_TYPE.to_string(),
            token,
        })
    }

    /// Overrides the `reviewable_type` query parameter.
    pub fn with_reviewable_type(mut self, reviewable_type: impl Into<String>) -> Self {
        self.reviewable_type = reviewable_type.into();
        self
    }

    /// Full URL of the endpoint, without query string.
    pub fn endpoint(&self) -> String {
        format!("{}{SRS_LEVEL_DETAILS_PATH}", self.base_url)
    }
}

#[async_trait]
impl PageSource for ApiClient {
    async fn fetch_page(&self, level: ProficiencyLevel, page: u32) -> Result<PageOutcome> {
        let page_param = page.to_string();
        let cache_buster = chrono::Utc::now().timestamp_millis().to_string();

        tracing::debug!(level = %level, page, "Requesting page");

        let response = self
            .http
            .get(self.endpoint())
            .query(&[
                ("reviewable_type", self.reviewable_type.as_str()),
                ("level", level.api_name()),
                ("page", page_param.as_str()),
                ("_", cache_buster.as_str()),
            ])
            .header(AUTHORIZATION, self.token.header_value())
            .header(ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|source| Error::Transport {
                level,
                page,
                source,
            })?;

        let status = response.status();
        if status == END_OF_DATA_STATUS {
            tracing::debug!(level = %level, page, "End-of-data status received");
            return Ok(PageOutcome::End);
        }
        if !status.is_success() {
            return Err(Error::Http {
                level,
                status: status.as_u16(),
                page,
            });
        }

        let body = response.bytes().await.map_err(|source| Error::Transport {
            level,
            page,
            source,
        })?;
        let decoded: SrsPage = serde_json::from_slice(&body).map_err(|e| Error::Decode {
            level,
            page,
            message: e.to_string(),
        })?;

        Ok(PageOutcome::Page(decoded))
    }
}
