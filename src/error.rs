//! Error types for the fallible edges (storage, DOM, GPU setup)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("browser window or document unavailable")]
    NoWindow,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("local storage unavailable")]
    NoStorage,
    #[error("storage write failed: {0}")]
    Storage(String),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("graphics setup failed: {0}")]
    Graphics(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
