//! Whole-file JSON snapshot of a retained word set.

use crate::error::{CorpusError, Result};
use crate::model::WordAggregate;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

#[cfg(unix)]
const SNAPSHOT_MODE: u32 = 0o644;

/// Writes `words` as a JSON array, replacing `path` atomically.
pub fn save(path: impl AsRef<Path>, words: &[WordAggregate]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let tmp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, words)?;
        writer.flush()?;
    }
    // Temp files are created 0600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(SNAPSHOT_MODE))?;
    }
    tmp.persist(path).map_err(|err| CorpusError::PersistError {
        path: path.to_path_buf(),
        source: err.error,
    })?;

    log::info!("Wrote snapshot of {} words to {}", words.len(), path.display());
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<Vec<WordAggregate>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let words: Vec<WordAggregate> = serde_json::from_reader(BufReader::new(file))?;
    log::info!("Loaded snapshot of {} words from {}", words.len(), path.display());
    Ok(words)
}
