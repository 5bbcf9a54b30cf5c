use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Usage of one word in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub year: i32,
    pub usage_count: u64,
    pub page_count: u64,
    pub book_count: u64,
}

impl Entry {
    #[must_use]
    pub const fn new(year: i32, usage_count: u64, page_count: u64, book_count: u64) -> Self {
        Self {
            year,
            usage_count,
            page_count,
            book_count,
        }
    }

    /// Occurrences per page, `None` when the entry has no pages.
    #[must_use]
    pub fn page_density(&self) -> Option<f64> {
        ratio(self.usage_count, self.page_count)
    }
}

/// A word aggregate that is still accumulating rows.
///
/// Only a shard reader holds one of these. Once the next word starts it is
/// consumed by [`OpenAggregate::seal`] and can no longer change.
#[derive(Debug, Clone, Default)]
pub struct OpenAggregate {
    text: String,
    entries_by_year: BTreeMap<i32, Entry>,
}

impl OpenAggregate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entries_by_year: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries_by_year.is_empty()
    }

    /// Records an entry; a second entry for the same year replaces the first.
    pub fn add_entry(&mut self, entry: Entry) {
        self.entries_by_year.insert(entry.year, entry);
    }

    /// Freezes the aggregate and caches its lifetime total.
    #[must_use]
    pub fn seal(self) -> WordAggregate {
        let total_count = self
            .entries_by_year
            .values()
            .map(|entry| entry.usage_count)
            .sum();
        WordAggregate {
            text: self.text,
            entries_by_year: self.entries_by_year,
            total_count,
        }
    }
}

/// The reduced, immutable record of one word across all years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AggregateRecord", into = "AggregateRecord")]
pub struct WordAggregate {
    text: String,
    entries_by_year: BTreeMap<i32, Entry>,
    total_count: u64,
}

impl WordAggregate {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Word length in characters.
    #[must_use]
    pub fn length(&self) -> usize {
        self.text.chars().count()
    }

    /// Entries in ascending year order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries_by_year.values()
    }

    #[must_use]
    pub fn entry(&self, year: i32) -> Option<&Entry> {
        self.entries_by_year.get(&year)
    }

    #[must_use]
    pub fn year_count(&self) -> usize {
        self.entries_by_year.len()
    }

    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.entries().map(|entry| entry.page_count).sum()
    }

    #[must_use]
    pub fn total_books(&self) -> u64 {
        self.entries().map(|entry| entry.book_count).sum()
    }

    /// Lifetime occurrences per page, `None` when no pages were recorded.
    #[must_use]
    pub fn total_page_density(&self) -> Option<f64> {
        ratio(self.total_count, self.total_pages())
    }

    /// Occurrences per page in `year`, `None` when the year is absent or has no pages.
    #[must_use]
    pub fn page_density(&self, year: i32) -> Option<f64> {
        self.entry(year).and_then(Entry::page_density)
    }

    #[must_use]
    pub fn usage_count(&self, year: i32) -> u64 {
        self.entry(year).map_or(0, |entry| entry.usage_count)
    }

    #[must_use]
    pub fn book_count(&self, year: i32) -> u64 {
        self.entry(year).map_or(0, |entry| entry.book_count)
    }
}

/// On-disk shape of a [`WordAggregate`]; the total is recomputed on load.
#[derive(Serialize, Deserialize)]
struct AggregateRecord {
    text: String,
    entries: BTreeMap<i32, Entry>,
}

impl From<AggregateRecord> for WordAggregate {
    fn from(record: AggregateRecord) -> Self {
        let mut open = OpenAggregate::new(record.text);
        for entry in record.entries.into_values() {
            open.add_entry(entry);
        }
        open.seal()
    }
}

impl From<WordAggregate> for AggregateRecord {
    fn from(word: WordAggregate) -> Self {
        Self {
            text: word.text,
            entries: word.entries_by_year,
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(numerator as f64 / denominator as f64)
}
