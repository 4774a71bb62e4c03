//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A token pair was missing one of its credentials.
    #[error("invalid token pair: {0}")]
    InvalidTokenPair(String),

    /// A request path is malformed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A query string could not be encoded.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A value failed a local validation rule before being sent.
    #[error("invalid {field}: {message}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
