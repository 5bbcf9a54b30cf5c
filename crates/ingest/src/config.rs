use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wordrank_corpus::{ShardFilter, DEFAULT_EXCLUDED_CHARS};

/// Configuration for one ingestion run.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Directory holding the shard and totals files
    pub shard_dir: PathBuf,

    /// Shard file stem; shard `i` is `<shard_base><i>.<shard_ext>`
    pub shard_base: String,

    /// Extension shared by shard and totals files
    pub shard_ext: String,

    /// First shard number (inclusive)
    pub shard_low: u32,

    /// Last shard number (inclusive)
    pub shard_high: u32,

    /// Totals file stem; the file is `<totals_base>.<shard_ext>`
    pub totals_base: String,

    /// Maximum number of words retained
    pub capacity: usize,

    /// Aggregates that may wait in the hand-off queue before readers block
    pub queue_capacity: usize,

    /// Skip words containing any of `excluded_chars`
    pub alpha_only: bool,

    pub excluded_chars: String,

    /// Emit each shard's last word at end of input
    pub flush_on_eof: bool,

    /// Words with a lower lifetime total are discarded (0 keeps everything)
    pub count_cutoff: u64,

    /// Where the retained set is written
    pub snapshot_path: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            shard_dir: PathBuf::from("."),
            shard_base: "grams".to_string(),
            shard_ext: "csv".to_string(),
            shard_low: 1,
            shard_high: 10,
            totals_base: "tots".to_string(),
            capacity: 10_000,
            queue_capacity: 100,
            alpha_only: true,
            excluded_chars: DEFAULT_EXCLUDED_CHARS.to_string(),
            flush_on_eof: true,
            count_cutoff: 0,
            snapshot_path: PathBuf::from("top.json"),
        }
    }
}

impl IngestConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(IngestError::InvalidConfig(
                "capacity must be > 0".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(IngestError::InvalidConfig(
                "queue_capacity must be > 0".to_string(),
            ));
        }
        if self.shard_low > self.shard_high {
            return Err(IngestError::InvalidConfig(format!(
                "shard_low ({}) cannot exceed shard_high ({})",
                self.shard_low, self.shard_high
            )));
        }
        Ok(())
    }

    /// Shard paths in shard-number order.
    #[must_use]
    pub fn shard_paths(&self) -> Vec<PathBuf> {
        (self.shard_low..=self.shard_high)
            .map(|i| {
                self.shard_dir
                    .join(format!("{}{i}.{}", self.shard_base, self.shard_ext))
            })
            .collect()
    }

    #[must_use]
    pub fn totals_path(&self) -> PathBuf {
        self.shard_dir
            .join(format!("{}.{}", self.totals_base, self.shard_ext))
    }

    #[must_use]
    pub fn shard_filter(&self) -> ShardFilter {
        ShardFilter {
            alpha_only: self.alpha_only,
            excluded_chars: self.excluded_chars.clone(),
            flush_on_eof: self.flush_on_eof,
        }
    }
}
