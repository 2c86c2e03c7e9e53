//! # Error Types
//!
//! Domain-specific error types for ridehub-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ridehub-core errors (this file)                                       │
//! │  ├── CoreError        - Booking rule violations                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ridehub-store errors (separate crate)                                 │
//! │  └── StoreError       - Document store failures                        │
//! │                                                                         │
//! │  ridehub-engine errors                                                 │
//! │  └── EngineError      - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                          StoreError ─┴─► EngineError → Mobile app      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::BookingStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Booking rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested lifecycle action is not legal from the current status.
    ///
    /// ## When This Occurs
    /// - Completing a booking that was never confirmed
    /// - Any action on a Complete or Cancelled booking
    /// - Rating a booking that is not Complete
    #[error("Booking {booking_id} is {from}, cannot {action}")]
    InvalidTransition {
        booking_id: String,
        from: BookingStatus,
        action: &'static str,
    },

    /// Ratings for this booking were already submitted.
    #[error("Booking {booking_id} has already been rated")]
    AlreadyRated { booking_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business rule runs or any write is attempted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (unparseable date, clock time, range preset).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Return date precedes pickup date.
    #[error("Return date {end} is before pickup date {start}")]
    InvalidDateRange { start: String, end: String },

    /// Return instant is not strictly after the pickup instant.
    #[error("Return time must be after pickup time")]
    NonPositiveDuration,

    /// No authenticated identity, or it does not match the acting user.
    #[error("An authenticated user is required to {action}")]
    Unauthenticated { action: String },
}

impl ValidationError {
    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Required error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
