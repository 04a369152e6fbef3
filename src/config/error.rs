//! Environment configuration error types.

use thiserror::Error;

/// Environment loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read environment file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("failed to parse environment file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("validation failed: {0}")]
    Validation(String),
}
