use crate::error::{RankingError, Result};
use crate::maxima::NormalizationMaxima;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use wordrank_corpus::WordAggregate;

/// Caller-supplied feature weights. Any finite value is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub length: f64,
    pub count: f64,
    pub pages: f64,
    pub books: f64,
}

impl WeightVector {
    #[must_use]
    pub const fn new(length: f64, count: f64, pages: f64, books: f64) -> Self {
        Self {
            length,
            count,
            pages,
            books,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("length", self.length),
            ("count", self.count),
            ("pages", self.pages),
            ("books", self.books),
        ] {
            if !value.is_finite() {
                return Err(RankingError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Which values feed the count, density and books features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMode {
    /// Usage, page density and books of the requested year
    #[default]
    PerYear,

    /// Lifetime totals regardless of the requested year
    Lifetime,
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerYear => f.write_str("per-year"),
            Self::Lifetime => f.write_str("lifetime"),
        }
    }
}

impl FromStr for ScoringMode {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "per-year" => Ok(Self::PerYear),
            "lifetime" => Ok(Self::Lifetime),
            other => Err(RankingError::invalid_request(format!(
                "unknown scoring mode '{other}' (expected per-year or lifetime)"
            ))),
        }
    }
}

/// The four scoring features of one word, raw or normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Features {
    pub length: f64,
    pub count: f64,
    pub density: f64,
    pub books: f64,
}

/// Weighted sum of max-normalized features for one year.
///
/// A feature whose maximum is zero contributes zero, and so does a density
/// that is undefined (absent year or zero pages).
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    maxima: &'a NormalizationMaxima,
    weights: WeightVector,
    year: i32,
    mode: ScoringMode,
}

impl<'a> Scorer<'a> {
    #[must_use]
    pub const fn new(
        maxima: &'a NormalizationMaxima,
        weights: WeightVector,
        year: i32,
        mode: ScoringMode,
    ) -> Self {
        Self {
            maxima,
            weights,
            year,
            mode,
        }
    }

    #[must_use]
    pub fn raw_features(&self, word: &WordAggregate) -> Features {
        match self.mode {
            ScoringMode::PerYear => Features {
                length: word.length() as f64,
                count: word.usage_count(self.year) as f64,
                density: word.page_density(self.year).unwrap_or(0.0),
                books: word.book_count(self.year) as f64,
            },
            ScoringMode::Lifetime => Features {
                length: word.length() as f64,
                count: word.total_count() as f64,
                density: word.total_page_density().unwrap_or(0.0),
                books: word.total_books() as f64,
            },
        }
    }

    /// Lifetime density is divided by the largest page total, per-year
    /// density by the largest single-year density.
    #[must_use]
    pub fn normalized_features(&self, word: &WordAggregate) -> Features {
        let raw = self.raw_features(word);
        let max_density = match self.mode {
            ScoringMode::PerYear => self.maxima.max_year_density,
            ScoringMode::Lifetime => self.maxima.max_pages as f64,
        };
        Features {
            length: normalize(raw.length, self.maxima.max_length as f64),
            count: normalize(raw.count, self.maxima.max_count as f64),
            density: normalize(raw.density, max_density),
            books: normalize(raw.books, self.maxima.max_books as f64),
        }
    }

    /// Weighted sum of the normalized features. Negative zero is folded
    /// into positive zero.
    #[must_use]
    pub fn score(&self, word: &WordAggregate) -> f64 {
        let features = self.normalized_features(word);
        let sum = self.weights.length * features.length
            + self.weights.count * features.count
            + self.weights.pages * features.density
            + self.weights.books * features.books;
        sum + 0.0
    }
}

fn normalize(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

/// Totally ordered score for use as a map key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score(pub f64);

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wordrank_corpus::{Entry, OpenAggregate};

    fn word(text: &str, entries: &[(i32, u64, u64, u64)]) -> WordAggregate {
        let mut open = OpenAggregate::new(text);
        for &(year, usage, pages, books) in entries {
            open.add_entry(Entry::new(year, usage, pages, books));
        }
        open.seal()
    }

    fn corpus() -> Vec<WordAggregate> {
        vec![
            word("the", &[(1999, 600, 100, 40), (2000, 400, 80, 30)]),
            word("cat", &[(2000, 50, 25, 10)]),
            word("aardvark", &[(1999, 3, 0, 1), (2000, 7, 7, 2)]),
        ]
    }

    #[test]
    fn zero_weights_score_zero() {
        let words = corpus();
        let maxima = NormalizationMaxima::compute(&words);
        for mode in [ScoringMode::PerYear, ScoringMode::Lifetime] {
            let scorer = Scorer::new(&maxima, WeightVector::default(), 2000, mode);
            for word in &words {
                assert_eq!(scorer.score(word), 0.0);
            }
        }
    }

    #[test]
    fn unit_weight_isolates_one_feature() {
        let words = corpus();
        let maxima = NormalizationMaxima::compute(&words);
        let unit = [
            WeightVector::new(1.0, 0.0, 0.0, 0.0),
            WeightVector::new(0.0, 1.0, 0.0, 0.0),
            WeightVector::new(0.0, 0.0, 1.0, 0.0),
            WeightVector::new(0.0, 0.0, 0.0, 1.0),
        ];

        for mode in [ScoringMode::PerYear, ScoringMode::Lifetime] {
            for word in &words {
                let features =
                    Scorer::new(&maxima, WeightVector::default(), 2000, mode).normalized_features(word);
                let expected = [
                    features.length,
                    features.count,
                    features.density,
                    features.books,
                ];
                for (weights, expected) in unit.iter().zip(expected) {
                    let scorer = Scorer::new(&maxima, *weights, 2000, mode);
                    assert_eq!(scorer.score(word), expected);
                }
            }
        }
    }

    #[test]
    fn per_year_features_follow_the_year() {
        let words = corpus();
        let maxima = NormalizationMaxima::compute(&words);
        let scorer = Scorer::new(&maxima, WeightVector::default(), 2000, ScoringMode::PerYear);

        let raw = scorer.raw_features(&words[0]);
        assert_eq!(raw.count, 400.0);
        assert_eq!(raw.density, 5.0);
        assert_eq!(raw.books, 30.0);

        let lifetime = Scorer::new(&maxima, WeightVector::default(), 2000, ScoringMode::Lifetime)
            .raw_features(&words[0]);
        assert_eq!(lifetime.count, 1000.0);
        assert_eq!(lifetime.books, 70.0);
    }

    #[test]
    fn undefined_density_contributes_zero() {
        let words = vec![word("zero", &[(1999, 3, 0, 1)])];
        let maxima = NormalizationMaxima::compute(&words);
        let weights = WeightVector::new(0.0, 0.0, 1.0, 0.0);

        for mode in [ScoringMode::PerYear, ScoringMode::Lifetime] {
            let score = Scorer::new(&maxima, weights, 1999, mode).score(&words[0]);
            assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn lifetime_density_is_normalized_by_max_pages() {
        let words = vec![word("a", &[(2000, 100, 10, 1)]), word("b", &[(2000, 5, 50, 1)])];
        let maxima = NormalizationMaxima::compute(&words);
        let scorer = Scorer::new(
            &maxima,
            WeightVector::new(0.0, 0.0, 1.0, 0.0),
            2000,
            ScoringMode::Lifetime,
        );

        assert_eq!(scorer.score(&words[0]), 10.0 / 50.0);
        assert_eq!(scorer.score(&words[1]), 0.1 / 50.0);
    }

    #[test]
    fn per_year_density_is_normalized_by_max_year_density() {
        let words = vec![word("a", &[(2000, 100, 10, 1)]), word("b", &[(2000, 5, 50, 1)])];
        let maxima = NormalizationMaxima::compute(&words);
        let scorer = Scorer::new(
            &maxima,
            WeightVector::new(0.0, 0.0, 1.0, 0.0),
            2000,
            ScoringMode::PerYear,
        );

        assert_eq!(scorer.score(&words[0]), 1.0);
        assert_eq!(scorer.score(&words[1]), 0.1 / 10.0);
    }

    #[test]
    fn negative_weights_on_zero_features_score_positive_zero() {
        let words = vec![word("unused", &[(2000, 0, 0, 0)])];
        let maxima = NormalizationMaxima::compute(&words);
        let scorer = Scorer::new(
            &maxima,
            WeightVector::new(-0.0, -1.0, -1.0, -2.0),
            2000,
            ScoringMode::PerYear,
        );

        let score = scorer.score(&words[0]);
        assert_eq!(score, 0.0);
        assert!(score.is_sign_positive());
        assert_eq!(Score(score).cmp(&Score(0.0)), Ordering::Equal);
    }

    #[test]
    fn zero_maximum_normalizes_to_zero() {
        let words = vec![word("nobook", &[(2000, 5, 1, 0)])];
        let maxima = NormalizationMaxima::compute(&words);
        let scorer = Scorer::new(&maxima, WeightVector::new(0.0, 0.0, 0.0, 3.0), 2000, ScoringMode::PerYear);
        assert_eq!(scorer.score(&words[0]), 0.0);
    }

    #[test]
    fn negative_weights_are_allowed() {
        let weights = WeightVector::new(-1.0, 0.5, 0.0, -2.0);
        assert!(weights.validate().is_ok());

        let words = corpus();
        let maxima = NormalizationMaxima::compute(&words);
        let scorer = Scorer::new(&maxima, weights, 2000, ScoringMode::PerYear);
        assert!(scorer.score(&words[2]) < 0.0);
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        let err = WeightVector::new(0.0, f64::NAN, 0.0, 0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, RankingError::InvalidWeight { name: "count", .. }));
        assert!(WeightVector::new(f64::INFINITY, 0.0, 0.0, 0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn scoring_mode_parses() {
        assert_eq!("lifetime".parse::<ScoringMode>().unwrap(), ScoringMode::Lifetime);
        assert_eq!(ScoringMode::PerYear.to_string(), "per-year");
        assert!("yearly".parse::<ScoringMode>().is_err());
    }

    #[test]
    fn score_orders_totally() {
        let mut scores = vec![Score(0.5), Score(-1.0), Score(2.0), Score(0.5)];
        scores.sort();
        assert_eq!(scores, vec![Score(-1.0), Score(0.5), Score(0.5), Score(2.0)]);
    }
}
