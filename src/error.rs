//! Error types for the lab client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the lab client
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Fetching test details from the backend failed
    #[error("Failed to fetch test data: {0}")]
    FetchError(String),

    /// The report host refused to open a new viewing context
    #[error("{0}")]
    LaunchError(String),

    /// An embedded JSON field could not be decoded
    #[error("Failed to decode {field}: {reason}")]
    DecodeError { field: String, reason: String },
}
