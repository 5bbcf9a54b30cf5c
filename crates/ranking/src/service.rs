use crate::error::Result;
use crate::maxima::ScoringSnapshot;
use crate::rank::{build_ranking, RankedPoint};
use crate::scoring::{Scorer, ScoringMode, WeightVector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use wordrank_corpus::snapshot;

/// A rescoring request: the year to project onto and the feature weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RescoreRequest {
    pub year: i32,
    pub weights: WeightVector,
}

/// Holds a scoring snapshot and the most recently computed ranking.
///
/// `rescore` replaces the ranking; `page` reads slices of it.
#[derive(Debug, Clone)]
pub struct RankingService {
    snapshot: ScoringSnapshot,
    mode: ScoringMode,
    ranked: Vec<RankedPoint>,
    last_request: Option<RescoreRequest>,
}

impl RankingService {
    #[must_use]
    pub const fn new(snapshot: ScoringSnapshot, mode: ScoringMode) -> Self {
        Self {
            snapshot,
            mode,
            ranked: Vec::new(),
            last_request: None,
        }
    }

    pub fn from_snapshot_file(path: impl AsRef<Path>, mode: ScoringMode) -> Result<Self> {
        let words = snapshot::load(path)?;
        Ok(Self::new(ScoringSnapshot::new(words), mode))
    }

    #[must_use]
    pub const fn snapshot(&self) -> &ScoringSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub const fn mode(&self) -> ScoringMode {
        self.mode
    }

    #[must_use]
    pub const fn last_request(&self) -> Option<&RescoreRequest> {
        self.last_request.as_ref()
    }

    /// Recomputes the ranking and returns its length.
    ///
    /// In per-year mode words with no entry for the year are left out. An
    /// invalid request leaves the previous ranking untouched.
    pub fn rescore(&mut self, request: &RescoreRequest) -> Result<usize> {
        request.weights.validate()?;
        log::info!(
            "Rescoring {} words for {} ({} mode, weights {:?})",
            self.snapshot.len(),
            request.year,
            self.mode,
            request.weights
        );

        let scorer = Scorer::new(
            self.snapshot.maxima(),
            request.weights,
            request.year,
            self.mode,
        );
        let year = request.year;
        let mode = self.mode;
        let scored = self
            .snapshot
            .words()
            .iter()
            .filter(|word| mode == ScoringMode::Lifetime || word.entry(year).is_some())
            .map(|word| (word, scorer.score(word)));

        self.ranked = build_ranking(scored, year);
        self.last_request = Some(*request);
        Ok(self.ranked.len())
    }

    #[must_use]
    pub fn ranked(&self) -> &[RankedPoint] {
        &self.ranked
    }

    /// Up to `count` points starting at `offset`, clamped to the ranking.
    #[must_use]
    pub fn page(&self, offset: usize, count: usize) -> &[RankedPoint] {
        let start = offset.min(self.ranked.len());
        let end = start.saturating_add(count).min(self.ranked.len());
        &self.ranked[start..end]
    }
}
