use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use wordrank_corpus::ShardStats;

/// Completion signal sent by a shard reader exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardReport {
    pub path: PathBuf,

    pub stats: ShardStats,

    /// Why the shard ended early (open or read failure)
    pub error: Option<String>,
}

/// Statistics about an ingestion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// One report per shard, in completion order
    pub shards: Vec<ShardReport>,

    /// Aggregates received from readers
    pub received: u64,

    /// Aggregates discarded by the count cutoff
    pub below_cutoff: u64,

    /// Aggregates dropped because their total equalled a retained one
    pub collisions: u64,

    /// Aggregates evicted as the minimum
    pub evictions: u64,

    /// Size of the final set
    pub retained: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl IngestStats {
    pub fn add_shard(&mut self, report: ShardReport) {
        self.shards.push(report);
    }

    #[must_use]
    pub fn rows(&self) -> u64 {
        self.shards.iter().map(|report| report.stats.rows).sum()
    }

    #[must_use]
    pub fn failed_shards(&self) -> usize {
        self.shards
            .iter()
            .filter(|report| report.error.is_some())
            .count()
    }
}
