use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Corpus error: {0}")]
    CorpusError(#[from] wordrank_corpus::CorpusError),

    #[error("Config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}
