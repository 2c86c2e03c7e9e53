//! # Engine Error Type
//!
//! The one error type every public operation returns.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in RideHub                                │
//! │                                                                         │
//! │  Presentation layer              Engine                                 │
//! │  ──────────────────              ──────                                 │
//! │                                                                         │
//! │  engine.submit_rating(...)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Validation? ─── ValidationError ───────────────┐               │  │
//! │  │  Rule broken? ── CoreError::InvalidTransition ──┤               │  │
//! │  │  Store down? ─── StoreError::Unavailable ───────┼─► EngineError │  │
//! │  │  Guard lost? ─── PreconditionFailed("rated") ───┘  AlreadyRated │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ErrorResponse { code: "ALREADY_RATED", message: "Booking ... rated" } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is retried; retry policy belongs to the caller.

use ridehub_core::{BookingStatus, CoreError, ValidationError};
use ridehub_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The document store could not be reached.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A referenced vehicle, supplier or booking does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The lifecycle action is not legal from the booking's current status.
    #[error("Booking {booking_id} is {from}, cannot {action}")]
    InvalidTransition {
        booking_id: String,
        from: BookingStatus,
        action: &'static str,
    },

    /// Ratings were already submitted for this booking.
    #[error("Booking {booking_id} has already been rated")]
    AlreadyRated { booking_id: String },

    /// Malformed input or missing identity.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::InvalidTransition { .. } => "INVALID_TRANSITION",
            EngineError::AlreadyRated { .. } => "ALREADY_RATED",
            EngineError::Validation(_) => "VALIDATION_ERROR",
            EngineError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// The `{code, message}` pair handed to the presentation layer.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// What the presentation layer receives when an operation fails.
///
/// ```json
/// { "code": "ALREADY_RATED", "message": "Booking bk-1 has already been rated" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTransition {
                booking_id,
                from,
                action,
            } => EngineError::InvalidTransition {
                booking_id,
                from,
                action,
            },
            CoreError::AlreadyRated { booking_id } => EngineError::AlreadyRated { booking_id },
            CoreError::Validation(v) => EngineError::Validation(v),
        }
    }
}

/// Convert store errors to engine errors.
///
/// ## Error Mapping
/// ```text
/// Unavailable / MigrationFailed                → StoreUnavailable
/// NotFound { collection, id }                   → NotFound
/// InvalidField                                  → Validation
/// Serialization (malformed stored record)       → Validation
/// Conflict / PreconditionFailed                 → StoreUnavailable (callers that
///                                                 expect these map them first)
/// ```
impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => EngineError::NotFound {
                entity: collection,
                id,
            },
            StoreError::InvalidField(field) => EngineError::Validation(
                ValidationError::invalid_format(field, "not a queryable field name"),
            ),
            // Retrying will not repair a corrupt document.
            StoreError::Serialization(reason) => {
                EngineError::Validation(ValidationError::invalid_format("document", reason))
            }
            other => EngineError::StoreUnavailable(other.to_string()),
        }
    }
}
