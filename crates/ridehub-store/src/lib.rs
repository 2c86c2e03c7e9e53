//! # ridehub-store: Document Store Layer for RideHub
//!
//! The engine never talks to a database directly; it is handed a
//! [`DocumentStore`] at construction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RideHub Data Flow                                │
//! │                                                                         │
//! │  RentalEngine (discover / create_booking / submit_rating / toggle)     │
//! │       │                                                                 │
//! │       │  Arc<dyn DocumentStore>                                         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   ridehub-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ DocumentStore │    │  MemoryStore  │    │ SqliteStore  │  │   │
//! │  │   │   (trait)     │◄───│  (tests/fake) │    │ (persistent) │  │   │
//! │  │   │               │◄───┼───────────────┼────│ migrations   │  │   │
//! │  │   │ WriteBatch    │    │ RwLock<maps>  │    │ SqlitePool   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - The `DocumentStore` trait
//! - [`document`] - Document value and encode/decode helpers
//! - [`batch`] - Atomic write batches with field preconditions
//! - [`memory`] - In-memory implementation
//! - [`sqlite`] - SQLite implementation and pool config
//! - [`migrations`] - Embedded schema migrations
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ridehub_store::{DocumentStore, SqliteConfig, SqliteStore};
//!
//! let store = SqliteStore::connect(SqliteConfig::new("ridehub.db")).await?;
//! let vehicles = store.list_all("vehicles").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod document;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod sqlite;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use batch::{WriteBatch, WriteOp};
pub use document::{to_data, Document};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::{SqliteConfig, SqliteStore};
pub use store::{generate_id, DocumentStore};
