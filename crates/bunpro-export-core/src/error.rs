//! Error types for the exporter library.

use std::path::{Path, PathBuf};

use crate::level::ProficiencyLevel;

/// Errors that can occur while capturing a token, fetching pages or writing CSV.
///
/// Marked `#[non_exhaustive]` so new failure modes can be added without
/// breaking callers that match on it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The API answered with a status other than success or the end-of-data sentinel.
    #[error("{level} HTTP {status} on page {page}")]
    Http {
        /// Level being fetched when the request failed
        level: ProficiencyLevel,
        /// HTTP status code returned by the server
        status: u16,
        /// 1-based page number
        page: u32,
    },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("Request for {level} page {page} failed: {source}")]
    Transport {
        /// Level being fetched
        level: ProficiencyLevel,
        /// 1-based page number
        page: u32,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// A response body could not be decoded.
    #[error("Could not decode {level} page {page}: {message}")]
    Decode {
        /// Level being fetched
        level: ProficiencyLevel,
        /// 1-based page number
        page: u32,
        /// Decoder message
        message: String,
    },

    /// No token could be found within the bounded wait.
    #[error(
        "Couldn't get token after {waited_secs}s. Trigger any Bunpro request (e.g. 'See More') and try again."
    )]
    TokenUnavailable {
        /// How long we waited before giving up
        waited_secs: u64,
    },

    /// A token source was read but held nothing usable.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// What was wrong with it
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error with the path that caused it.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON error outside of API decoding (HAR files, for instance).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience `Result` alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether the user can fix this without touching the network.
    ///
    /// Token, auth and configuration problems are actionable; transport and
    /// I/O failures are environmental.
    pub fn is_user_actionable(&self) -> bool {
        match self {
            Error::Http { status, .. } => matches!(status, 401 | 403),
            Error::TokenUnavailable { .. } => true,
            Error::InvalidToken { .. } => true,
            Error::Config { .. } => true,
            Error::Transport { .. } => false,
            Error::Decode { .. } => false,
            Error::Io { .. } => false,
            Error::Json(_) => true,
            Error::Csv(_) => false,
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid token error.
    pub fn invalid_token<S: Into<String>>(message: S) -> Self {
        Error::InvalidToken {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
