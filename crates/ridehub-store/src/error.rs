//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error / simulated outage                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← categorized by what the caller can do      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EngineError (ridehub-engine) ← StoreUnavailable / NotFound / ...      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Presentation layer shows the message                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Document store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the operation failed in transit.
    ///
    /// ## When This Occurs
    /// - Pool closed or timed out
    /// - Disk or I/O errors
    /// - The in-memory store was switched offline
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// An update or precondition targeted a document that does not exist.
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// A create targeted an id that already exists.
    #[error("{collection}/{id} already exists")]
    Conflict { collection: String, id: String },

    /// A batch precondition did not hold; nothing in the batch was written.
    #[error("Precondition failed on {collection}/{id}: {field}")]
    PreconditionFailed {
        collection: String,
        id: String,
        field: String,
    },

    /// Field names are restricted to `[A-Za-z0-9_]`.
    #[error("Invalid field name: '{0}'")]
    InvalidField(String),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Schema migration failed at startup.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl StoreError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn conflict(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::Conflict {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// True for transport-level failures.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound
/// sqlx::Error::Database       → UNIQUE → Conflict, otherwise Unavailable
/// Pool / I/O / protocol       → StoreError::Unavailable
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::not_found("documents", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("UNIQUE constraint failed") {
                    StoreError::conflict("documents", "unknown")
                } else {
                    StoreError::Unavailable(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::Unavailable("connection pool exhausted".to_string()),

            sqlx::Error::PoolClosed => StoreError::Unavailable("pool is closed".to_string()),

            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
