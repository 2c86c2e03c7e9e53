//! # Validation Module
//!
//! Input checks run before any business rule or store write.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Mobile form (external)                                                 │
//! │  └── pickers constrain most input, but values arrive as strings         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Engine operation                                                       │
//! │  ├── THIS MODULE: ids, scores, comments                                 │
//! │  └── datetime: dates and clock times                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Document store write (batched, preconditioned)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_COMMENT_LENGTH, MAX_RATING_SCORE, MIN_RATING_SCORE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a document id supplied by the caller.
///
/// ## Example
/// ```rust
/// use ridehub_core::validation::validate_id;
///
/// assert!(validate_id("vehicle_id", "veh-1").is_ok());
/// assert!(validate_id("vehicle_id", "  ").is_err());
/// assert!(validate_id("vehicle_id", "a/b").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    if id.len() > 128 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 128,
        });
    }
    // Path separators would break document keys.
    if id.contains('/') {
        return Err(ValidationError::invalid_format(field, "must not contain '/'"));
    }
    Ok(())
}

/// Validates a 1-5 rating score.
pub fn validate_score(field: &str, score: u8) -> ValidationResult<()> {
    if !(MIN_RATING_SCORE..=MAX_RATING_SCORE).contains(&score) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: i64::from(MIN_RATING_SCORE),
            max: i64::from(MAX_RATING_SCORE),
        });
    }
    Ok(())
}

/// Normalizes an optional comment: trimmed, blank becomes `None`.
pub fn validate_comment(field: &str, comment: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(text) = comment.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_COMMENT_LENGTH,
        });
    }
    Ok(Some(text.to_string()))
}
