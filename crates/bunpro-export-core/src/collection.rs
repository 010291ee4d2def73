//! First-seen-wins vocabulary collection.

use std::collections::{HashMap, HashSet};

use crate::api::SrsPage;
use crate::level::ProficiencyLevel;

/// One exported row: the term, its meaning and the level it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabEntry {
    /// The vocabulary term (unique key)
    pub term: String,
    /// English meaning
    pub meaning: String,
    /// Level the term was first seen in
    pub level: ProficiencyLevel,
}

/// Vocabulary keyed by term, in first-insertion order.
///
/// A term that reappears on a later page or in a later level keeps the
/// entry from its first appearance.
#[derive(Debug, Clone, Default)]
pub struct VocabCollection {
    entries: Vec<VocabEntry>,
    seen: HashSet<String>,
}

impl VocabCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry` unless its term is already present.
    ///
    /// Returns `true` if the entry was added.
    pub fn insert(&mut self, entry: VocabEntry) -> bool {
        if self.seen.contains(&entry.term) {
            return false;
        }
        self.seen.insert(entry.term.clone());
        self.entries.push(entry);
        true
    }

    /// Merges one API page fetched for `level`.
    ///
    /// Each review is joined to its included item by id. Reviews whose item
    /// is missing or has an empty title are skipped. Returns how many new
    /// terms were added.
    pub fn merge_page(&mut self, page: &SrsPage, level: ProficiencyLevel) -> usize {
        let vocab: HashMap<&str, (&str, &str)> = page
            .reviews
            .included
            .iter()
            .filter_map(|item| {
                let id = item.id.as_deref()?;
                let attrs = &item.attributes;
                Some((id, (attrs.title.trim(), attrs.meaning.trim())))
            })
            .collect();

        let mut added = 0;
        for review in &page.reviews.data {
            let Some(id) = review.attributes.reviewable_id.as_deref() else {
                continue;
            };
            let Some(&(title, meaning)) = vocab.get(id) else {
                continue;
            };
            if title.is_empty() {
                continue;
            }
            let inserted = self.insert(VocabEntry {
                term: title.to_string(),
                meaning: meaning.to_string(),
                level,
            });
            if inserted {
                added += 1;
            }
        }
        added
    }

    /// Number of unique terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &VocabEntry> {
        self.entries.iter()
    }

    /// Number of entries attributed to each level, in fetch order.
    ///
    /// Levels with no entries are omitted.
    pub fn counts_by_level(&self) -> Vec<(ProficiencyLevel, usize)> {
        ProficiencyLevel::ALL
            .into_iter()
            .filter_map(|level| {
                let count = self.entries.iter().filter(|e| e.level == level).count();
                (count > 0).then_some((level, count))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a VocabCollection {
    type Item = &'a VocabEntry;
    type IntoIter = std::slice::Iter<'a, VocabEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
