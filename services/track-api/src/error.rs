//! Error types for the track service.

use cyclone_common::CycloneError;
use thiserror::Error;

use crate::registry::UnknownProvider;

/// Result type alias using TrackApiError.
pub type TrackApiResult<T> = Result<T, TrackApiError>;

/// Reasons a request resolves to no upstream work.
///
/// None of these reach the HTTP boundary as failures; the pipeline turns
/// them into an empty collection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackApiError {
    #[error(transparent)]
    InvalidCycloneId(#[from] CycloneError),

    #[error(transparent)]
    UnknownProvider(#[from] UnknownProvider),

    #[error("Provider '{provider}' does not support {operation}")]
    Unsupported {
        provider: String,
        operation: &'static str,
    },

    #[error("Request cancelled before assembly")]
    Cancelled,
}
