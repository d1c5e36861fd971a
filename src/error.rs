//! Error handling for requests

use thiserror::Error;

/// Main error type for requests operations
#[derive(Error, Debug)]
pub enum RequestsError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Multipart encoding error: {0}")]
    MultipartEncoding(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for requests operations
pub type Result<T> = std::result::Result<T, RequestsError>;
