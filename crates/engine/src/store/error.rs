//! Event store error types

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by an event store backend.
///
/// `Unavailable` is a first-class variant rather than a caught exception: the
/// engine checks for it and degrades to an empty result, leaving previously
/// cached snapshots untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing table or collection is missing or unreachable
    #[error("event store unavailable: {0}")]
    Unavailable(String),

    /// Record could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any other backend failure
    #[error("internal store error: {0}")]
    Internal(String),
}
