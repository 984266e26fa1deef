use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EcomapError {
    #[error("failed to load dataset from {path}: {reason}")]
    DatasetLoad { path: PathBuf, reason: String },

    #[error("invalid dataset: {0}")]
    DatasetInvalid(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
