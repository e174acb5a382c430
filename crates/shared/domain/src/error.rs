//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or a value is out of policy
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Plate number does not match the plate grammar
    #[error("Invalid plate number")]
    InvalidPlate,

    /// `valid_from` is after `valid_to`
    #[error("Invalid date range")]
    InvalidRange,

    /// Role is not one of the closed role set
    #[error("Unknown role: {0}")]
    InvalidRole(String),

    /// Stored credential could not be parsed
    #[error("Malformed credential: {0}")]
    CredentialFormat(String),

    /// Hashing primitive failed
    #[error("Hashing failed: {0}")]
    Hashing(String),
}

impl DomainError {
    /// Create an invalid input error
    pub fn invalid(msg: impl Into<String>) -> Self {
        DomainError::InvalidInput(msg.into())
    }

    /// Create a credential format error
    pub fn credential_format(msg: impl Into<String>) -> Self {
        DomainError::CredentialFormat(msg.into())
    }

    /// Create a hashing error
    pub fn hashing(msg: impl Into<String>) -> Self {
        DomainError::Hashing(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
