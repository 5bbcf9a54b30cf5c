use serde::{Deserialize, Serialize};
use wordrank_corpus::WordAggregate;

/// Per-feature maxima over a retained word set, used as normalizers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationMaxima {
    /// Longest word, in characters
    pub max_length: usize,

    /// Largest lifetime usage total
    pub max_count: u64,

    /// Largest lifetime page total
    pub max_pages: u64,

    /// Largest lifetime book total
    pub max_books: u64,

    /// Largest page density of any single year
    pub max_year_density: f64,
}

impl NormalizationMaxima {
    /// One pass over `words`.
    #[must_use]
    pub fn compute(words: &[WordAggregate]) -> Self {
        let mut maxima = Self::default();
        for word in words {
            maxima.max_length = maxima.max_length.max(word.length());
            maxima.max_count = maxima.max_count.max(word.total_count());
            maxima.max_pages = maxima.max_pages.max(word.total_pages());
            maxima.max_books = maxima.max_books.max(word.total_books());
            for entry in word.entries() {
                if let Some(density) = entry.page_density() {
                    maxima.max_year_density = maxima.max_year_density.max(density);
                }
            }
        }
        maxima
    }
}

/// An immutable retained set together with the maxima computed from it.
///
/// The maxima are computed once here; a different word set needs a new
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScoringSnapshot {
    words: Vec<WordAggregate>,
    maxima: NormalizationMaxima,
}

impl ScoringSnapshot {
    #[must_use]
    pub fn new(words: Vec<WordAggregate>) -> Self {
        let maxima = NormalizationMaxima::compute(&words);
        log::debug!("Computed maxima over {} words: {maxima:?}", words.len());
        Self { words, maxima }
    }

    #[must_use]
    pub fn words(&self) -> &[WordAggregate] {
        &self.words
    }

    #[must_use]
    pub const fn maxima(&self) -> &NormalizationMaxima {
        &self.maxima
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
