use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::merger::{FanInMerger, MergeConfig, MergeOutcome};
use wordrank_corpus::snapshot;

/// Merges every configured shard and writes the retained set to the snapshot.
///
/// Individual shards may fail without failing the run. When no shard could
/// be read at all the previous snapshot is left in place.
pub fn run_ingest(config: &IngestConfig) -> Result<MergeOutcome> {
    config.validate()?;
    let shards = config.shard_paths();
    log::info!(
        "Ingesting {} shards from {} (capacity {})",
        shards.len(),
        config.shard_dir.display(),
        config.capacity
    );

    let merger = FanInMerger::new(MergeConfig::from(config));
    let outcome = merger.merge(&shards, &config.shard_filter());

    if outcome.stats.failed_shards() == shards.len() {
        return Err(IngestError::Other(format!(
            "none of the {} shards in {} could be read",
            shards.len(),
            config.shard_dir.display()
        )));
    }

    snapshot::save(&config.snapshot_path, &outcome.retained)?;
    Ok(outcome)
}
