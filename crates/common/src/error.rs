use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Strategy not found: {id}")]
    StrategyNotFound { id: String },

    #[error("Fingerprint error: {0}")]
    Fingerprint(String),

    #[error("Strategy instantiation failed in module '{module}': {reason}")]
    Instantiation { module: String, reason: String },

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
