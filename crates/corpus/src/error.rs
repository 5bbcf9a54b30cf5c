use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CorpusError>;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to persist snapshot {path}: {source}")]
    PersistError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}
