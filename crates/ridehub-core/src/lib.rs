//! # ridehub-core: Pure Business Logic for RideHub
//!
//! The numeric and state-machine heart of the rental engine. Everything in
//! here is a pure function over plain values; the store-facing pipeline
//! lives in `ridehub-engine`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RideHub Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Mobile app (external presentation layer)           │   │
//! │  │   Dashboard ──► Vehicle detail ──► Confirm booking ──► Rating   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │   ridehub-engine: discover / create_booking / cancel / rate     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ridehub-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌────────┐ ┌────────┐ ┌──────────┐ ┌─────────┐ ┌──────────┐  │   │
//! │  │   │  geo   │ │ rating │ │ datetime │ │ booking │ │  filter  │  │   │
//! │  │   │Haversin│ │ mean + │ │ 12h clock│ │  state  │ │predicates│  │   │
//! │  │   │  km    │ │ count  │ │ day count│ │ machine │ │  + sort  │  │   │
//! │  │   └────────┘ └────────┘ └──────────┘ └─────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Vehicle, Supplier, Booking, Rating, ...)
//! - [`money`] - Integer centavo money type
//! - [`geo`] - Great-circle distance
//! - [`rating`] - Rating aggregation and presentation
//! - [`datetime`] - Date + 12-hour clock resolution, day counts
//! - [`booking`] - Booking state machine and price quotes
//! - [`filter`] - Discovery filter predicates and distance sort
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ridehub_core::booking::quote;
//! use ridehub_core::datetime::DateTimeResolver;
//! use ridehub_core::money::Money;
//!
//! let pickup = DateTimeResolver::parse_date("2024-01-01").unwrap();
//! let ret = DateTimeResolver::parse_date("2024-01-03").unwrap();
//!
//! let q = quote(Money::from_major(500), pickup, ret).unwrap();
//! assert_eq!(q.days, 3);
//! assert_eq!(q.total, Money::from_major(1500));
//! ```

pub mod booking;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod geo;
pub mod money;
pub mod rating;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use rating::RatingSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Business name shown when a listing's supplier record cannot be found.
pub const UNKNOWN_SUPPLIER_NAME: &str = "Unknown";

/// Lowest score a renter may give.
pub const MIN_RATING_SCORE: u8 = 1;

/// Highest score a renter may give.
pub const MAX_RATING_SCORE: u8 = 5;

/// Maximum length of a rating comment, in characters.
pub const MAX_COMMENT_LENGTH: usize = 500;
