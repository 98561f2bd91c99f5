//! Error types for cyclone-track services.

use thiserror::Error;

/// Result type alias using CycloneError.
pub type CycloneResult<T> = Result<T, CycloneError>;

/// Primary error type for cyclone track operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CycloneError {
    #[error("Invalid cyclone identifier: '{0}' (expected BBSSYYYY, e.g. WP012026)")]
    InvalidCycloneId(String),
}
