//! Progress reporting while an export runs.

use crate::level::ProficiencyLevel;

/// Receives progress events from the [`Exporter`](crate::Exporter).
///
/// Only [`notify`](ProgressSink::notify) is required; the structured hooks
/// default to formatting a message and forwarding it there.
pub trait ProgressSink: Send + Sync {
    /// A human-readable progress message.
    fn notify(&self, message: &str);

    /// Called before the first page of `level` is requested.
    fn level_started(&self, level: ProficiencyLevel) {
        self.notify(&format!("Fetching {level}…"));
    }

    /// Called after a page has been merged.
    fn page_merged(&self, level: ProficiencyLevel, page: u32, added: usize) {
        let _ = (level, page, added);
    }

    /// Called once `level` has no more pages.
    fn level_finished(&self, level: ProficiencyLevel, pages: u32, added: usize) {
        self.notify(&format!("{level}: {added} new items from {pages} pages"));
    }
}

/// Reports progress as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn notify(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn page_merged(&self, level: ProficiencyLevel, page: u32, added: usize) {
        tracing::debug!(level = %level, page, added, "Page merged");
    }
}
