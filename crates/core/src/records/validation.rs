//! Input validation shared by every record's create and patch inputs.
//!
//! Validation is run by the HTTP layer before a repository is called;
//! repositories themselves never validate.

use chrono::NaiveDate;
use thiserror::Error;

/// Maximum length for short text fields (names, titles, codes).
pub const MAX_SHORT_TEXT: usize = 200;

/// Maximum length for free-form text fields (descriptions, details).
pub const MAX_LONG_TEXT: usize = 5_000;

/// Errors produced when request input is malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("{field} too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} is not a valid email address")]
    InvalidEmail { field: &'static str },
    #[error("{later} must be on or after {earlier}")]
    DateOrder {
        earlier: &'static str,
        later: &'static str,
    },
    #[error("Invalid query parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
    /// Rejected by a remote server, carrying its message.
    #[error("{0}")]
    Rejected(String),
}

/// Types that can check their own contents before being persisted.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Checks that a required text field is non-blank and within `max` characters.
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Like [`require_text`], but only when the value is present.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => require_text(field, v, max),
        None => Ok(()),
    }
}

/// Minimal email shape check: one `@` with a non-empty local part and a dotted domain.
pub fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require_text(field, value, MAX_SHORT_TEXT)?;

    let valid = match value.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail { field })
    }
}

/// Checks that `later` is not before `earlier` when both dates are known.
pub fn require_date_order(
    earlier_field: &'static str,
    earlier: Option<NaiveDate>,
    later_field: &'static str,
    later: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (earlier, later) {
        (Some(e), Some(l)) if l < e => Err(ValidationError::DateOrder {
            earlier: earlier_field,
            later: later_field,
        }),
        _ => Ok(()),
    }
}
