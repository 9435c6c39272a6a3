//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// This is the full failure taxonomy a request can surface: validation,
/// missing rows, uniqueness conflicts, and store failures. The inner string
/// is the client-facing message; the HTTP layer maps variants to statuses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Credentials did not authenticate.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness conflict (duplicate value for a unique field/key).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An unexpected store/infrastructure failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Client-facing message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::InvalidId(m)
            | Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Internal(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_pick_the_right_variant() {
        assert!(matches!(
            DomainError::validation("bad"),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            DomainError::not_found("Branch not found"),
            DomainError::NotFound(_)
        ));
        assert!(matches!(
            DomainError::conflict("dup"),
            DomainError::Conflict(_)
        ));
    }

    #[test]
    fn message_returns_the_inner_text() {
        let err = DomainError::not_found("Branch not found");
        assert_eq!(err.message(), "Branch not found");

        let err = DomainError::conflict("Tag with this name already exists");
        assert_eq!(err.message(), "Tag with this name already exists");
    }
}
