use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankingError>;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("Corpus error: {0}")]
    CorpusError(#[from] wordrank_corpus::CorpusError),

    #[error("Invalid {name} weight: {value} (weights must be finite)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RankingError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}
