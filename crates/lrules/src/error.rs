use thiserror::Error;

#[derive(Error, Debug)]
pub enum LrulesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed report header: {0}")]
    MalformedHeader(String),

    #[error("Report parse error: {0}")]
    Parse(String),

    #[error("Rules and data disagree: {0}")]
    SchemaMismatch(String),

    #[error("Malformed tab data: {0}")]
    Dataset(String),

    #[error("Clustering error: {0}")]
    Clustering(String),
}

pub type Result<T> = std::result::Result<T, LrulesError>;
