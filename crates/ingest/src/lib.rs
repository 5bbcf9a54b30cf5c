//! # Wordrank Ingest
//!
//! Reduces shard-partitioned usage corpora to the `capacity` words with the
//! highest lifetime totals.
//!
//! ## Pipeline
//!
//! ```text
//! grams1.csv ── ShardReader (thread) ──┐
//! grams2.csv ── ShardReader (thread) ──┼──> bounded queue ──> merger ──> OrderedTopK
//!    ...                               │                        ▲
//! gramsN.csv ── ShardReader (thread) ──┘   completion signals ──┘
//!                                                                   │
//!                                                                   └─> top.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use wordrank_ingest::{run_ingest, IngestConfig};
//!
//! fn main() -> wordrank_ingest::Result<()> {
//!     let config = IngestConfig::load("wordrank.toml")?;
//!     let outcome = run_ingest(&config)?;
//!     println!("retained {} words", outcome.stats.retained);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod merger;
mod pipeline;
mod stats;

pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use merger::{FanInMerger, MergeConfig, MergeOutcome};
pub use pipeline::run_ingest;
pub use stats::{IngestStats, ShardReport};
