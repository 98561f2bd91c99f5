//! Error types for feed parsing.

use thiserror::Error;

/// Result type for feed parser operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Error types for feed parsing.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Payload is not JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Payload is empty or whitespace
    #[error("Empty feed document")]
    EmptyDocument,
}
