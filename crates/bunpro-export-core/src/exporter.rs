//! The export loop: every level, page by page, merged into one collection.

use std::sync::Arc;
use std::time::Duration;

use crate::client::{PageOutcome, PageSource};
use crate::collection::VocabCollection;
use crate::error::Result;
use crate::level::ProficiencyLevel;
use crate::progress::{ProgressSink, TracingProgress};

/// Default pause between consecutive page requests.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(150);

/// Per-level outcome of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSummary {
    /// Level fetched
    pub level: ProficiencyLevel,
    /// Pages that carried data
    pub pages: u32,
    /// New terms this level contributed
    pub added: usize,
}

/// Everything an export produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Deduplicated vocabulary, in first-seen order
    pub vocab: VocabCollection,
    /// One summary per fetched level, in fetch order
    pub per_level: Vec<LevelSummary>,
}

impl ExportSummary {
    /// Number of unique terms exported.
    pub fn total(&self) -> usize {
        self.vocab.len()
    }

    /// Pages with data across all levels.
    pub fn pages_fetched(&self) -> u32 {
        self.per_level.iter().map(|l| l.pages).sum()
    }
}

/// Walks the configured levels sequentially and collects their vocabulary.
///
/// Requests are strictly one at a time with a fixed delay between pages.
/// The first error aborts the whole run.
pub struct Exporter {
    source: Arc<dyn PageSource>,
    progress: Arc<dyn ProgressSink>,
    levels: Vec<ProficiencyLevel>,
    page_delay: Duration,
}

impl Exporter {
    /// Creates an exporter over all five levels with the default delay.
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            source,
            progress: Arc::new(TracingProgress),
            levels: ProficiencyLevel::ALL.to_vec(),
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Restricts the export to `levels`, fetched in the given order.
    pub fn with_levels(mut self, levels: Vec<ProficiencyLevel>) -> Self {
        self.levels = levels;
        self
    }

    /// Sets the pause between page requests.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Sets where progress is reported.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Runs the export.
    pub async fn run(&self) -> Result<ExportSummary> {
        let mut vocab = VocabCollection::new();
        let mut per_level = Vec::with_capacity(self.levels.len());

        for &level in &self.levels {
            per_level.push(self.fetch_level(level, &mut vocab).await?);
        }

        tracing::info!(total = vocab.len(), "Export finished");
        Ok(ExportSummary { vocab, per_level })
    }

    async fn fetch_level(
        &self,
        level: ProficiencyLevel,
        vocab: &mut VocabCollection,
    ) -> Result<LevelSummary> {
        self.progress.level_started(level);

        let mut page = 1;
        let mut pages = 0;
        let mut added = 0;

        loop {
            let data = match self.source.fetch_page(level, page).await? {
                PageOutcome::End => break,
                PageOutcome::Page(data) if data.is_empty() => break,
                PageOutcome::Page(data) => data,
            };

            let new_terms = vocab.merge_page(&data, level);
            self.progress.page_merged(level, page, new_terms);
            added += new_terms;
            pages += 1;
            page += 1;

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        self.progress.level_finished(level, pages, added);
        Ok(LevelSummary {
            level,
            pages,
            added,
        })
    }
}
