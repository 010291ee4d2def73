//! Capturing the API token the browser already sends.
//!
//! Bunpro's frontend authenticates API calls with an
//! `Authorization: Token token=<token>` header. We cannot hook the page, so
//! the token is lifted from whatever the browser can hand us: a HAR export
//! from devtools, a copied request ("Copy as cURL", raw headers, "Copy as
//! fetch"), or the bare token itself. Once captured it is cached in a
//! [`TokenStore`] so later runs do not need to capture it again.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio::time::{Instant, sleep};

use crate::error::{Error, Result};

/// Scheme prefix Bunpro puts in front of the raw token.
const TOKEN_PREFIX: &str = "Token token=";

const AUTHORIZATION: &str = "authorization";

// ============================================================================
// AuthToken
// ============================================================================

/// A normalized Bunpro API token (without the `Token token=` prefix).
///
/// `Debug` output is redacted so tokens do not end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value to send in the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("{TOKEN_PREFIX}{}", self.0)
    }

    /// Short form safe to print: the first four characters and an ellipsis.
    pub fn redacted(&self) -> String {
        let head: String = self.0.chars().take(4).collect();
        format!("{head}…")
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&self.redacted()).finish()
    }
}

/// Normalizes a raw `Authorization` value into a token.
///
/// Accepts either the full header value (`Token token=abc`) or the bare
/// token. Returns `None` when nothing usable remains.
pub fn normalize(raw: &str) -> Option<AuthToken> {
    let raw = strip_quotes(raw);
    let token = match raw.find(TOKEN_PREFIX) {
        Some(idx) => &raw[idx + TOKEN_PREFIX.len()..],
        None => raw,
    };
    let token = strip_quotes(token);
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(AuthToken(token.to_string()))
}

fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

// ============================================================================
// Capture
// ============================================================================

/// Returns the token from the first `Authorization` header in `headers`.
///
/// Header names are matched case-insensitively.
pub fn capture_from_headers<'a, I>(headers: I) -> Option<AuthToken>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .find(|(name, _)| name.trim().eq_ignore_ascii_case(AUTHORIZATION))
        .and_then(|(_, value)| normalize(value))
}

#[derive(Debug, Deserialize)]
struct Har {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    #[serde(default)]
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
struct HarEntry {
    request: HarRequest,
}

#[derive(Debug, Deserialize)]
struct HarRequest {
    #[serde(default)]
    url: String,
    #[serde(default)]
    headers: Vec<HarHeader>,
}

#[derive(Debug, Deserialize)]
struct HarHeader {
    name: String,
    #[serde(default)]
    value: String,
}

/// Extracts the most recently sent token from a HAR document.
///
/// Entries are scanned in recorded order and the last token seen wins, so a
/// token refreshed mid-session replaces the stale one.
pub fn capture_from_har(har_json: &str) -> Result<Option<AuthToken>> {
    let har: Har = serde_json::from_str(har_json)?;
    let mut latest = None;
    for entry in &har.log.entries {
        let headers = entry
            .request
            .headers
            .iter()
            .map(|h| (h.name.as_str(), h.value.as_str()));
        if let Some(token) = capture_from_headers(headers) {
            tracing::debug!(url = %entry.request.url, "Found Authorization header in HAR entry");
            latest = Some(token);
        }
    }
    Ok(latest)
}

/// Extracts a token from free text such as a raw header dump, a copied
/// `curl` command or a copied `fetch(...)` call.
///
/// Every `Authorization:` occurrence is considered; the last one wins.
pub fn capture_from_text(text: &str) -> Option<AuthToken> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let mut latest = None;
    let mut from = 0;

    while let Some(pos) = lower[from..].find(AUTHORIZATION) {
        let name_start = from + pos;
        from = name_start + AUTHORIZATION.len();

        let preceded_by_word = text[..name_start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if preceded_by_word {
            continue;
        }

        let rest = &text[from..];
        let rest = rest.strip_prefix(['"', '\'']).unwrap_or(rest);
        let Some(rest) = rest.trim_start_matches([' ', '\t']).strip_prefix(':') else {
            continue;
        };
        let rest = rest.trim_start_matches([' ', '\t']);

        let value = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &rest[1..];
                let end = inner
                    .find(|c| c == quote || c == '\n' || c == '\r')
                    .unwrap_or(inner.len());
                &inner[..end]
            }
            _ => {
                let end = rest.find(['\n', '\r', '"', '\'']).unwrap_or(rest.len());
                &rest[..end]
            }
        };

        if let Some(token) = normalize(value) {
            latest = Some(token);
        }
    }

    latest
}

/// Explicit places to take a token from, checked in field order.
#[derive(Debug, Clone, Default)]
pub struct TokenSources {
    /// Token given directly, bare or as the full header value
    pub token: Option<String>,
    /// HAR export from the browser's network tab
    pub har: Option<PathBuf>,
    /// File holding a copied request (raw headers, cURL or fetch)
    pub headers: Option<PathBuf>,
}

/// Captures a token from the first source that is set.
///
/// Returns `Ok(None)` when no source is set. A source that is set but holds
/// no usable token is an [`Error::InvalidToken`].
pub fn capture_from_sources(sources: &TokenSources) -> Result<Option<AuthToken>> {
    if let Some(raw) = &sources.token {
        return normalize(raw)
            .map(Some)
            .ok_or_else(|| Error::invalid_token("explicit token is empty or malformed"));
    }
    if let Some(path) = &sources.har {
        let text = read_source(path)?;
        return capture_from_har(&text)?.map(Some).ok_or_else(|| {
            Error::invalid_token(format!(
                "no Authorization header found in {}",
                path.display()
            ))
        });
    }
    if let Some(path) = &sources.headers {
        let text = read_source(path)?;
        return capture_from_text(&text).map(Some).ok_or_else(|| {
            Error::invalid_token(format!(
                "no Authorization header found in {}",
                path.display()
            ))
        });
    }
    Ok(None)
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))
}

// ============================================================================
// TokenStore
// ============================================================================

/// File-backed cache for the last captured token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by `path`. Nothing is touched until used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached token. A missing or empty file yields `None`.
    pub fn load(&self) -> Result<Option<AuthToken>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(normalize(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io_with_path(e, &self.path)),
        }
    }

    /// Saves `token`, replacing whatever was cached.
    pub fn save(&self, token: &AuthToken) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }
        std::fs::write(&self.path, format!("{}\n", token.as_str()))
            .map_err(|e| Error::io_with_path(e, &self.path))?;
        restrict_permissions(&self.path)?;
        tracing::debug!(path = %self.path.display(), token = %token.redacted(), "Token cached");
        Ok(())
    }

    /// Removes the cached token. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io_with_path(e, &self.path)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| Error::io_with_path(e, path))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

// ============================================================================
// Bounded wait
// ============================================================================

/// Polls `source` until it yields a token or `timeout` elapses.
///
/// The source runs once immediately, then every `poll_interval`.
pub async fn wait_for_token<F>(
    mut source: F,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<AuthToken>
where
    F: FnMut() -> Result<Option<AuthToken>>,
{
    let started = Instant::now();
    loop {
        if let Some(token) = source()? {
            return Ok(token);
        }
        if started.elapsed() >= timeout {
            return Err(Error::TokenUnavailable {
                waited_secs: timeout.as_secs(),
            });
        }
        sleep(poll_interval).await;
    }
}
