//! Error types for dictionary loading and configuration.
//!
//! Detection itself never fails; these only surface at the edges where data
//! enters the engine.

use thiserror::Error;

/// Result alias using the engine's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid dictionary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid dictionary shape: {0}")]
    Shape(String),

    #[error("invalid config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
