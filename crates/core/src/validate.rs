//! Shared field validation helpers.
//!
//! Domain crates validate their inputs with these; each helper returns a
//! `DomainError::Validation` carrying the client-facing message.

use crate::error::{DomainError, DomainResult};

/// Require a string field's character length to fall within `min..=max`.
pub fn require_len(field: &str, value: &str, min: usize, max: usize) -> DomainResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(DomainError::validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

/// Require a string field's character length to be at least `min`, with no
/// upper bound.
pub fn require_min_len(field: &str, value: &str, min: usize) -> DomainResult<()> {
    if value.chars().count() < min {
        return Err(DomainError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}

/// Require a plausibly well-formed email address.
///
/// Intentionally lenient: one `@`, non-empty local part, and a domain
/// containing a dot with no surrounding whitespace.
pub fn require_email(field: &str, value: &str) -> DomainResult<()> {
    let well_formed = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !well_formed {
        return Err(DomainError::validation(format!(
            "{field} must be a valid email address"
        )));
    }
    Ok(())
}

/// Require a numeric field to be a finite number (no NaN/infinity).
pub fn require_finite(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() {
        return Err(DomainError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    Ok(())
}
