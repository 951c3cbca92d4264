//! Error types for the bike-share services.

use bicycle_transit::BikeShareError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    BikeShare(#[from] BikeShareError),

    #[error("Missing configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
