use crate::config::IngestConfig;
use crate::stats::{IngestStats, ShardReport};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;
use wordrank_corpus::{ShardFilter, ShardReader, WordAggregate};
use wordrank_topk::{Direction, InsertOutcome, OrderedTopK};

/// Sizing for a merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeConfig {
    /// Maximum number of words retained
    pub capacity: usize,

    /// Aggregates buffered between readers and the merger
    pub queue_capacity: usize,

    /// Minimum lifetime total for a word to be considered
    pub count_cutoff: u64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            queue_capacity: 100,
            count_cutoff: 0,
        }
    }
}

impl From<&IngestConfig> for MergeConfig {
    fn from(config: &IngestConfig) -> Self {
        Self {
            capacity: config.capacity,
            queue_capacity: config.queue_capacity,
            count_cutoff: config.count_cutoff,
        }
    }
}

/// Result of merging a set of shards.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Retained words, highest total first
    pub retained: Vec<WordAggregate>,

    pub stats: IngestStats,
}

/// Runs one reader thread per shard and folds their output into a single
/// bounded set ranked by lifetime total.
///
/// Readers hand aggregates over a bounded queue, so a fast reader blocks
/// once the queue is full. The set itself lives on the calling thread only.
/// The merge ends after one completion signal per shard.
pub struct FanInMerger {
    config: MergeConfig,
}

impl FanInMerger {
    #[must_use]
    pub const fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn merge(&self, shards: &[PathBuf], filter: &ShardFilter) -> MergeOutcome {
        let started = Instant::now();
        let (word_tx, word_rx) = bounded::<WordAggregate>(self.config.queue_capacity.max(1));
        let (done_tx, done_rx) = bounded::<ShardReport>(shards.len().max(1));
        let mut state = MergeState::new(self.config);

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(shards.len());
            for path in shards {
                let words = word_tx.clone();
                let done = CompletionGuard::new(path.clone(), done_tx.clone());
                let filter = filter.clone();
                handles.push(scope.spawn(move || {
                    let mut done = done;
                    read_shard(&filter, words, &mut done);
                }));
            }
            drop(word_tx);
            drop(done_tx);

            state.collect(shards.len(), &word_rx, &done_rx);

            for handle in handles {
                if handle.join().is_err() {
                    log::error!("Shard reader thread panicked");
                }
            }
        });

        let mut stats = state.stats;
        stats.retained = state.retained.len();
        stats.time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!(
            "Merged {} shards: {} received, {} retained, {} collisions, {} evictions",
            shards.len(),
            stats.received,
            stats.retained,
            stats.collisions,
            stats.evictions
        );

        MergeOutcome {
            retained: state.retained.into_sorted_vec(Direction::Descending),
            stats,
        }
    }
}

struct MergeState {
    retained: OrderedTopK<u64, WordAggregate>,
    count_cutoff: u64,
    stats: IngestStats,
}

impl MergeState {
    fn new(config: MergeConfig) -> Self {
        Self {
            retained: OrderedTopK::bounded(config.capacity),
            count_cutoff: config.count_cutoff,
            stats: IngestStats::default(),
        }
    }

    fn collect(
        &mut self,
        expected: usize,
        words: &Receiver<WordAggregate>,
        done: &Receiver<ShardReport>,
    ) {
        let mut pending = expected;
        let mut words_open = true;

        while pending > 0 {
            let signal = if words_open {
                select! {
                    recv(words) -> msg => {
                        match msg {
                            Ok(word) => self.offer(word),
                            Err(_) => words_open = false,
                        }
                        None
                    }
                    recv(done) -> msg => Some(msg),
                }
            } else {
                Some(done.recv())
            };

            match signal {
                None => {}
                Some(Ok(report)) => {
                    pending -= 1;
                    log::debug!(
                        "Shard {} finished ({pending} outstanding)",
                        report.path.display()
                    );
                    self.stats.add_shard(report);
                }
                Some(Err(_)) => {
                    log::error!("Completion channel closed with {pending} shards outstanding");
                    break;
                }
            }
        }

        // Readers finish sending before they signal, so anything still queued
        // belongs to a completed shard.
        for word in words.try_iter() {
            self.offer(word);
        }
    }

    fn offer(&mut self, word: WordAggregate) {
        self.stats.received += 1;
        if word.total_count() < self.count_cutoff {
            self.stats.below_cutoff += 1;
            return;
        }
        match self.retained.insert(word.total_count(), word) {
            InsertOutcome::Retained => {}
            InsertOutcome::Collided(word) => {
                self.stats.collisions += 1;
                log::trace!(
                    "Dropped '{}': total {} already retained",
                    word.text(),
                    word.total_count()
                );
            }
            InsertOutcome::Evicted { .. } => self.stats.evictions += 1,
        }
    }
}

/// Sends the shard's completion report when dropped, so the merger hears
/// from every reader whether it finished, failed to open, or panicked.
struct CompletionGuard {
    report: Option<ShardReport>,
    done: Sender<ShardReport>,
}

impl CompletionGuard {
    fn new(path: PathBuf, done: Sender<ShardReport>) -> Self {
        Self {
            report: Some(ShardReport {
                path,
                ..ShardReport::default()
            }),
            done,
        }
    }

    fn path(&self) -> &Path {
        self.report
            .as_ref()
            .map_or_else(|| Path::new(""), |report| report.path.as_path())
    }

    fn record(&mut self, stats: wordrank_corpus::ShardStats, error: Option<String>) {
        if let Some(report) = self.report.as_mut() {
            report.stats = stats;
            report.error = error;
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let Some(mut report) = self.report.take() else {
            return;
        };
        if thread::panicking() && report.error.is_none() {
            report.error = Some("reader panicked".to_string());
        }
        if self.done.send(report).is_err() {
            log::error!("Merger stopped before shard completion was recorded");
        }
    }
}

fn read_shard(filter: &ShardFilter, words: Sender<WordAggregate>, done: &mut CompletionGuard) {
    let path = done.path().to_path_buf();
    let mut reader = match ShardReader::open(&path, filter.clone()) {
        Ok(reader) => reader,
        Err(err) => {
            log::warn!("Skipping unreadable shard {}: {err}", path.display());
            done.record(Default::default(), Some(err.to_string()));
            return;
        }
    };
    log::info!("Reading shard {}", path.display());

    for word in reader.by_ref() {
        if words.send(word).is_err() {
            log::warn!("Merger hung up while reading {}", path.display());
            break;
        }
    }

    let stats = reader.stats();
    let error = reader.read_error().map(ToString::to_string);
    log::info!(
        "Finished shard {}: {} rows, {} words",
        path.display(),
        stats.rows,
        stats.aggregates
    );
    done.record(stats, error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_shard(dir: &Path, name: &str, rows: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, rows).unwrap();
        path
    }

    fn texts(words: &[WordAggregate]) -> Vec<&str> {
        words.iter().map(WordAggregate::text).collect()
    }

    #[test]
    fn equal_totals_keep_first_arrival() {
        let tmp = TempDir::new().unwrap();
        let shard = write_shard(
            tmp.path(),
            "grams1.csv",
            "the\t2000\t1000\t10\t5\ncat\t2000\t50\t5\t2\ndog\t2000\t50\t4\t1\n",
        );
        let merger = FanInMerger::new(MergeConfig {
            capacity: 2,
            ..MergeConfig::default()
        });

        let outcome = merger.merge(&[shard], &ShardFilter::default());

        assert_eq!(texts(&outcome.retained), vec!["the", "cat"]);
        assert_eq!(outcome.stats.collisions, 1);
        assert_eq!(outcome.stats.evictions, 0);
        assert_eq!(outcome.stats.retained, 2);
    }

    #[test]
    fn missing_shard_still_completes() {
        let tmp = TempDir::new().unwrap();
        let good = write_shard(tmp.path(), "grams1.csv", "cat\t2000\t5\t1\t1\n");
        let missing = tmp.path().join("grams2.csv");

        let outcome = FanInMerger::new(MergeConfig::default())
            .merge(&[good, missing.clone()], &ShardFilter::default());

        assert_eq!(texts(&outcome.retained), vec!["cat"]);
        assert_eq!(outcome.stats.shards.len(), 2);
        assert_eq!(outcome.stats.failed_shards(), 1);
        let failed = outcome
            .stats
            .shards
            .iter()
            .find(|report| report.error.is_some())
            .unwrap();
        assert_eq!(failed.path, missing);
    }

    #[test]
    fn cutoff_discards_rare_words() {
        let tmp = TempDir::new().unwrap();
        let shard = write_shard(
            tmp.path(),
            "grams1.csv",
            "rare\t2000\t3\t1\t1\ncommon\t2000\t300\t10\t4\n",
        );
        let merger = FanInMerger::new(MergeConfig {
            count_cutoff: 100,
            ..MergeConfig::default()
        });

        let outcome = merger.merge(&[shard], &ShardFilter::default());

        assert_eq!(texts(&outcome.retained), vec!["common"]);
        assert_eq!(outcome.stats.below_cutoff, 1);
        assert_eq!(outcome.stats.received, 2);
    }

    #[test]
    fn no_shards_yields_empty_set() {
        let outcome = FanInMerger::new(MergeConfig::default()).merge(&[], &ShardFilter::default());
        assert!(outcome.retained.is_empty());
        assert!(outcome.stats.shards.is_empty());
    }
}
