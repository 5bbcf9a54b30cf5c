//! # Wordrank Corpus
//!
//! Record model and file formats for word usage corpora.
//!
//! ## Pipeline
//!
//! ```text
//! grams<N>.csv (word, year, usage, pages, books; grouped by word)
//!     │
//!     ├──> ShardReader
//!     │      └─> OpenAggregate ──seal──> WordAggregate
//!     │
//!     └──> snapshot::save / snapshot::load
//!            └─> top.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use wordrank_corpus::{ShardFilter, ShardReader};
//!
//! fn main() -> wordrank_corpus::Result<()> {
//!     let reader = ShardReader::open("grams1.csv", ShardFilter::default())?;
//!     for word in reader {
//!         println!("{}: {}", word.text(), word.total_count());
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod model;
mod shard;
pub mod snapshot;
mod totals;

pub use error::{CorpusError, Result};
pub use model::{Entry, OpenAggregate, WordAggregate};
pub use shard::{ShardFilter, ShardReader, ShardStats, DEFAULT_EXCLUDED_CHARS};
pub use totals::{YearTotal, YearTotals};
