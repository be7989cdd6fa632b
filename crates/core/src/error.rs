//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every operation surfaces its failure to the immediate caller as one of
/// these kinds; nothing is swallowed and nothing is retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed pin, negative quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Registration conflict: the trimmed username is already taken.
    ///
    /// The store's uniqueness constraint is the authoritative source of this
    /// signal; callers must not pre-check existence.
    #[error("username already taken")]
    DuplicateUsername,

    /// Authentication failure.
    ///
    /// Intentionally identical for "unknown username" and "wrong pin" so the
    /// error does not reveal which check failed.
    #[error("invalid username or pin")]
    InvalidCredentials,

    /// The actor is not allowed to perform the operation.
    #[error("unauthorized")]
    Unauthorized,

    /// The operation targets a record that does not exist.
    #[error("not found")]
    NotFound,

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The underlying store call failed for infrastructural reasons.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
