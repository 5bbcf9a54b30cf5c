//! # Wordrank Ranking
//!
//! On-demand rescoring of a retained word set with caller-supplied weights.
//!
//! ## Flow
//!
//! ```text
//! top.json ──> ScoringSnapshot (words + maxima, computed once)
//!                  │
//!   RescoreRequest ┼──> Scorer (normalized weighted sum per word)
//!                  │
//!                  └──> build_ranking (OrderedTopK keyed by score, word)
//!                           └─> [RankedPoint] ──> page(offset, count)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use wordrank_ranking::{RankingService, RescoreRequest, ScoringMode, WeightVector};
//!
//! fn main() -> wordrank_ranking::Result<()> {
//!     let mut service = RankingService::from_snapshot_file("top.json", ScoringMode::PerYear)?;
//!     service.rescore(&RescoreRequest {
//!         year: 2000,
//!         weights: WeightVector::new(0.0, 1.0, 0.5, 0.0),
//!     })?;
//!     for point in service.page(0, 20) {
//!         println!("{} {:.3}", point.word, point.y);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod maxima;
mod rank;
mod scoring;
mod service;

pub use error::{RankingError, Result};
pub use maxima::{NormalizationMaxima, ScoringSnapshot};
pub use rank::{build_ranking, RankedPoint};
pub use scoring::{Features, Score, Scorer, ScoringMode, WeightVector};
pub use service::{RankingService, RescoreRequest};
