use crate::error::Result;
use crate::model::{Entry, OpenAggregate, WordAggregate};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Characters that disqualify a word when `alpha_only` is set.
pub const DEFAULT_EXCLUDED_CHARS: &str = "1234567890~`!@#$%&:;*()+=/-[]{}|\\\"^";

/// Row-level filtering and end-of-stream policy for a shard reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardFilter {
    /// Reject words containing any of `excluded_chars`
    pub alpha_only: bool,

    /// Characters that mark a word as rejected
    pub excluded_chars: String,

    /// Emit the last open word when the stream ends
    pub flush_on_eof: bool,
}

impl Default for ShardFilter {
    fn default() -> Self {
        Self {
            alpha_only: true,
            excluded_chars: DEFAULT_EXCLUDED_CHARS.to_string(),
            flush_on_eof: true,
        }
    }
}

impl ShardFilter {
    /// Accept every word.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            alpha_only: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn rejects(&self, word: &str) -> bool {
        self.alpha_only && word.chars().any(|c| self.excluded_chars.contains(c))
    }
}

/// Row accounting for one shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardStats {
    /// Lines read, including skipped ones
    pub rows: u64,

    /// Lines with the wrong field count, bad UTF-8 or unparsable numbers
    pub malformed: u64,

    /// Lines belonging to words rejected by the filter
    pub rejected: u64,

    /// Aggregates handed downstream
    pub aggregates: u64,
}

/// Streams completed [`WordAggregate`]s out of a tab-separated shard.
///
/// Rows are `word, year, usage, pages, books` and must arrive grouped by
/// word. A word is emitted as soon as a row for a different word shows up.
/// A read failure ends the stream exactly like end of input does; the error
/// is kept for [`ShardReader::read_error`].
pub struct ShardReader<R> {
    reader: R,
    filter: ShardFilter,
    line: Vec<u8>,
    current: Option<OpenAggregate>,
    rejected_word: Option<String>,
    stats: ShardStats,
    read_error: Option<io::Error>,
    finished: bool,
}

impl ShardReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>, filter: ShardFilter) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file), filter))
    }
}

impl<R: BufRead> ShardReader<R> {
    pub fn new(reader: R, filter: ShardFilter) -> Self {
        Self {
            reader,
            filter,
            line: Vec::new(),
            current: None,
            rejected_word: None,
            stats: ShardStats::default(),
            read_error: None,
            finished: false,
        }
    }

    #[must_use]
    pub const fn stats(&self) -> ShardStats {
        self.stats
    }

    /// The fault that ended the stream early, if any.
    #[must_use]
    pub fn read_error(&self) -> Option<&io::Error> {
        self.read_error.as_ref()
    }

    fn accept(&mut self, raw: &[u8]) -> Option<WordAggregate> {
        self.stats.rows += 1;
        let Ok(line) = std::str::from_utf8(raw) else {
            self.stats.malformed += 1;
            return None;
        };
        let line = line.trim_end_matches(['\n', '\r']);

        let mut fields = line.split('\t');
        let (Some(text), Some(year), Some(usage), Some(pages), Some(books), None) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            self.stats.malformed += 1;
            return None;
        };

        // Rejected words arrive as a run; skip the run without rescanning.
        if self.rejected_word.as_deref() == Some(text) {
            self.stats.rejected += 1;
            return None;
        }
        if self.filter.rejects(text) {
            self.rejected_word = Some(text.to_string());
            self.stats.rejected += 1;
            return None;
        }

        let Some(entry) = parse_entry(year, usage, pages, books) else {
            self.stats.malformed += 1;
            return None;
        };

        match self.current.as_mut() {
            Some(current) if current.text() == text => {
                current.add_entry(entry);
                None
            }
            _ => {
                let mut next = OpenAggregate::new(text);
                next.add_entry(entry);
                let previous = self.current.replace(next)?;
                Some(self.emit(previous))
            }
        }
    }

    fn finish(&mut self) -> Option<WordAggregate> {
        self.finished = true;
        let tail = self.current.take()?;
        if !self.filter.flush_on_eof || tail.is_empty() {
            log::debug!("Dropping unflushed tail word '{}'", tail.text());
            return None;
        }
        Some(self.emit(tail))
    }

    fn emit(&mut self, open: OpenAggregate) -> WordAggregate {
        self.stats.aggregates += 1;
        open.seal()
    }
}

impl<R: BufRead> Iterator for ShardReader<R> {
    type Item = WordAggregate;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = std::mem::take(&mut self.line);
        let emitted = loop {
            if self.finished {
                break None;
            }
            line.clear();
            match self.reader.read_until(b'\n', &mut line) {
                Ok(0) => break self.finish(),
                Ok(_) => {
                    if let Some(word) = self.accept(&line) {
                        break Some(word);
                    }
                }
                Err(err) => {
                    log::warn!("Shard read failed after {} rows: {err}", self.stats.rows);
                    self.read_error = Some(err);
                    break self.finish();
                }
            }
        };
        self.line = line;
        emitted
    }
}

fn parse_entry(year: &str, usage: &str, pages: &str, books: &str) -> Option<Entry> {
    Some(Entry::new(
        year.trim().parse().ok()?,
        usage.trim().parse().ok()?,
        pages.trim().parse().ok()?,
        books.trim().parse().ok()?,
    ))
}
