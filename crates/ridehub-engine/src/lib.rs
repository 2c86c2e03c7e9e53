//! # ridehub-engine: Discovery & Booking Engine for RideHub
//!
//! The in-process library behind the renter app. It owns no UI and does no
//! authentication; the host injects a [`DocumentStore`] and an
//! [`IdentityProvider`] and calls the operations on [`RentalEngine`].
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Presentation layer                              │
//! │        (screens, map, date pickers - supplies GeoCoordinate)           │
//! └────────────────────────────────┬────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      RentalEngine (THIS CRATE)                          │
//! │                                                                         │
//! │   ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐     │
//! │   │ DiscoveryPipeline│  │ BookingLifecycle │  │  FavoriteToggle  │     │
//! │   │ discover         │  │ create_booking   │  │  toggle          │     │
//! │   │ favorites        │  │ confirm / cancel │  │                  │     │
//! │   │ located_suppliers│  │ mark_complete    │  │                  │     │
//! │   │                  │  │ submit_rating    │  │                  │     │
//! │   └────────┬─────────┘  └────────┬─────────┘  └────────┬─────────┘     │
//! │            │   ridehub-core rules (pure)                │               │
//! │            └─────────────────────┼──────────────────────┘               │
//! └──────────────────────────────────┼──────────────────────────────────────┘
//!                                    │ Arc<dyn DocumentStore>
//!                                    ▼
//!                  ┌──────────────────────────────────┐
//!                  │  MemoryStore  |  SqliteStore     │
//!                  └──────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`discovery`] - Listing enrichment, filtering and sorting
//! - [`booking`] - Booking creation, transitions, ratings
//! - [`favorites`] - Favorite membership
//! - [`identity`] - Signed-in user interface
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Engine error and response payload
//! - [`telemetry`] - Tracing subscriber setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ridehub_engine::{EngineConfig, RentalEngine, StaticIdentity};
//!
//! let config = EngineConfig::load_or_default(None);
//! let engine = RentalEngine::open(&config, Arc::new(StaticIdentity::signed_in(uid))).await?;
//!
//! let listings = engine.discover(Some(here), &DiscoveryFilter::new(), Some(uid)).await?;
//! ```

pub mod booking;
pub mod collections;
pub mod config;
pub mod discovery;
pub mod error;
pub mod favorites;
pub mod identity;
pub mod telemetry;

pub use booking::{BookingLifecycle, BookingRequest, RatingSubmission};
pub use config::EngineConfig;
pub use discovery::DiscoveryPipeline;
pub use error::{EngineError, EngineResult, ErrorResponse};
pub use favorites::FavoriteToggle;
pub use identity::{IdentityProvider, StaticIdentity};

use std::sync::Arc;

use ridehub_core::booking::BookingTab;
use ridehub_core::filter::DiscoveryFilter;
use ridehub_core::{Booking, GeoCoordinate, Rating, SupplierSummary, VehicleViewModel};
use ridehub_store::{DocumentStore, SqliteStore};
use tracing::info;

/// Facade over the three components, sharing one store.
pub struct RentalEngine {
    discovery: DiscoveryPipeline,
    bookings: BookingLifecycle,
    favorites: FavoriteToggle,
}

impl RentalEngine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        config: &EngineConfig,
    ) -> EngineResult<Self> {
        config.validate()?;

        Ok(RentalEngine {
            discovery: DiscoveryPipeline::new(
                Arc::clone(&store),
                config.discovery.enrichment_concurrency,
            ),
            bookings: BookingLifecycle::new(Arc::clone(&store), identity, config.resolver()?),
            favorites: FavoriteToggle::new(store),
        })
    }

    /// Opens the configured SQLite store, running migrations.
    pub async fn open(
        config: &EngineConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> EngineResult<Self> {
        let store = SqliteStore::connect(config.sqlite_config()).await?;
        info!(path = ?config.store.database_path, "Engine store opened");
        Self::new(Arc::new(store), identity, config)
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    pub async fn discover(
        &self,
        reference: Option<GeoCoordinate>,
        filter: &DiscoveryFilter,
        renter_id: Option<&str>,
    ) -> EngineResult<Vec<VehicleViewModel>> {
        self.discovery.discover(reference, filter, renter_id).await
    }

    pub async fn favorites(
        &self,
        renter_id: &str,
        reference: Option<GeoCoordinate>,
    ) -> EngineResult<Vec<VehicleViewModel>> {
        self.discovery.favorites(renter_id, reference).await
    }

    pub async fn located_suppliers(&self) -> EngineResult<Vec<SupplierSummary>> {
        self.discovery.located_suppliers().await
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    pub async fn create_booking(&self, request: &BookingRequest) -> EngineResult<Booking> {
        self.bookings.create_booking(request).await
    }

    pub async fn confirm(&self, booking_id: &str) -> EngineResult<Booking> {
        self.bookings.confirm(booking_id).await
    }

    pub async fn mark_complete(&self, booking_id: &str) -> EngineResult<Booking> {
        self.bookings.mark_complete(booking_id).await
    }

    pub async fn cancel(&self, booking_id: &str) -> EngineResult<Booking> {
        self.bookings.cancel(booking_id).await
    }

    pub async fn get_booking(&self, booking_id: &str) -> EngineResult<Booking> {
        self.bookings.get_booking(booking_id).await
    }

    pub async fn list_bookings(
        &self,
        renter_id: &str,
        tab: Option<BookingTab>,
    ) -> EngineResult<Vec<Booking>> {
        self.bookings.list_bookings(renter_id, tab).await
    }

    pub async fn submit_rating(
        &self,
        submission: &RatingSubmission,
    ) -> EngineResult<(Rating, Rating)> {
        self.bookings.submit_rating(submission).await
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Returns the new membership state.
    pub async fn toggle_favorite(&self, renter_id: &str, vehicle_id: &str) -> EngineResult<bool> {
        self.favorites.toggle(renter_id, vehicle_id).await
    }
}
