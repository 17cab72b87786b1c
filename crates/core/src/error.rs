//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Operations either succeed with their documented effects or fail with one of
/// these variants and leave state unchanged. Messages name the offending entity
/// and the attempted operation; presenting them is the caller's job.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation at construction time (e.g. empty name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An operation received an argument outside its domain
    /// (e.g. reducing stock by more than is available).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not defined for this kind of node
    /// (e.g. adding a child to a product leaf).
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
