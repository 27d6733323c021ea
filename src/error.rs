//! Error types for the memory vault

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the memory vault
#[derive(Error, Debug)]
pub enum Error {
    /// A record failed schema validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No record exists with the requested id
    #[error("Memory not found")]
    NotFound,

    /// The document store could not be read or written
    #[error("Store error: {0}")]
    Store(String),

    /// Snapshot encoding or decoding failed
    #[error("Image error: {0}")]
    Image(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// The remote API answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}
