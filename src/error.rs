use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildLensError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Calculation failed: {0}")]
    Calculation(String),

    #[error("Date calculation failed: cannot go back {days} days")]
    DateCalculation { days: i64 },

    #[error("Failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Invalid access token, check the token and try again")]
    InvalidToken,

    #[error("API rate limit reached, wait a while and try again")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BuildLensError>;
