#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # bunpro-export-core
//!
//! Exports a Bunpro user's vocabulary progress to CSV.
//!
//! The export is a straight line:
//! - capture the `Authorization` token the browser already sends ([`token`])
//! - page through the SRS level details endpoint, one level at a time ([`client`], [`exporter`])
//! - merge every page into a first-seen-wins collection ([`collection`])
//! - serialize the collection as fully quoted CSV ([`csv_writer`])

pub mod api;
pub mod client;
pub mod collection;
pub mod config;
pub mod csv_writer;
pub mod error;
pub mod exporter;
pub mod level;
pub mod progress;
pub mod token;

pub use client::{ApiClient, PageOutcome};
pub use collection::{VocabCollection, VocabEntry};
pub use config::ExportConfig;
pub use error::{Error, Result};
pub use exporter::{ExportSummary, Exporter};
pub use level::ProficiencyLevel;
pub use progress::{ProgressSink, TracingProgress};
pub use token::{AuthToken, TokenSources, TokenStore};
