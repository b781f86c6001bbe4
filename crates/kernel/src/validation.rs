//! Request shape validation shared by every resource.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// A single field rule violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}

/// Implemented by request payloads that carry field rules.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Character-count bounds, inclusive. `max` of `None` means unbounded.
pub fn length(
    field: &'static str,
    value: &str,
    min: usize,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    let count = value.chars().count();
    if count == 0 && min > 0 {
        return Err(ValidationError::Empty { field });
    }
    if count < min {
        return Err(ValidationError::TooShort { field, min });
    }
    match max {
        Some(max) if count > max => Err(ValidationError::TooLong { field, max }),
        _ => Ok(()),
    }
}

pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    non_empty(field, value)?;
    if !EMAIL.is_match(value) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "not a valid email address",
        });
    }
    Ok(())
}

pub fn range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}

/// Run `check` only when the optional value is present.
pub fn optional<T: ?Sized>(
    value: Option<&T>,
    check: impl FnOnce(&T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), check)
}
