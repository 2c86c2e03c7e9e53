//! # Discovery Pipeline
//!
//! Turns raw listings into the ranked result a renter browses.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_all(vehicles)                                                     │
//! │       │                                                                 │
//! │       ▼  per vehicle, at most `enrichment_concurrency` in flight        │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │  supplier lookup ──► distance_km      (distance needs supplier)   │  │
//! │  │  vehicle ratings ──► RatingSummary    (independent)               │  │
//! │  │  supplier ratings ─► RatingSummary    (independent)               │  │
//! │  │  favorite set membership                                          │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DiscoveryFilter::apply  (predicates, then nearest/farthest sort)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! - Missing or malformed supplier → "Unknown" placeholder, logged
//! - No ratings → `{average: 0, count: 0}`
//! - Malformed vehicle or rating document → skipped, logged
//! - Store unreachable at any step → `StoreUnavailable`, whole call fails

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use ridehub_core::filter::DiscoveryFilter;
use ridehub_core::geo::distance_between;
use ridehub_core::validation::validate_id;
use ridehub_core::{
    GeoCoordinate, Rating, RatingSummary, RatingTarget, Supplier, SupplierSummary, Vehicle,
    VehicleViewModel,
};
use ridehub_store::DocumentStore;
use serde_json::Value;
use tracing::{debug, warn};

use crate::collections::{RATINGS, SUPPLIERS, VEHICLES};
use crate::error::{EngineError, EngineResult};
use crate::favorites::favorite_vehicle_ids;

pub struct DiscoveryPipeline {
    store: Arc<dyn DocumentStore>,
    concurrency: usize,
}

impl DiscoveryPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, concurrency: usize) -> Self {
        DiscoveryPipeline {
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Loads, enriches, filters and sorts every listing.
    ///
    /// Each call reads a fresh snapshot; results are not paged.
    pub async fn discover(
        &self,
        reference: Option<GeoCoordinate>,
        filter: &DiscoveryFilter,
        renter_id: Option<&str>,
    ) -> EngineResult<Vec<VehicleViewModel>> {
        if let Some(renter) = renter_id {
            validate_id("renter_id", renter)?;
        }

        let vehicles = self.load_vehicles().await?;

        let favorites: HashSet<String> = match renter_id {
            Some(renter) => favorite_vehicle_ids(self.store.as_ref(), renter)
                .await?
                .into_iter()
                .collect(),
            None => HashSet::new(),
        };

        let total = vehicles.len();
        let enriched = self.enrich_all(vehicles, reference, &favorites).await?;
        let results = filter.apply(enriched);

        debug!(
            total,
            matched = results.len(),
            sort = ?filter.sort_order,
            "Discovery complete"
        );
        Ok(results)
    }

    /// The renter's favorite vehicles, enriched like discovery results.
    ///
    /// Favorites pointing at deleted vehicles are skipped.
    pub async fn favorites(
        &self,
        renter_id: &str,
        reference: Option<GeoCoordinate>,
    ) -> EngineResult<Vec<VehicleViewModel>> {
        validate_id("renter_id", renter_id)?;

        let ids = favorite_vehicle_ids(self.store.as_ref(), renter_id).await?;
        let mut vehicles = Vec::with_capacity(ids.len());

        for id in &ids {
            match self.store.get_by_id(VEHICLES, id).await? {
                Some(doc) => match doc.decode::<Vehicle>() {
                    Ok(vehicle) => vehicles.push(vehicle),
                    Err(e) => warn!(vehicle_id = %id, error = %e, "Skipping malformed vehicle"),
                },
                None => debug!(vehicle_id = %id, "Favorite points at a deleted vehicle"),
            }
        }

        let all: HashSet<String> = ids.into_iter().collect();
        self.enrich_all(vehicles, reference, &all).await
    }

    /// Suppliers with a known business location, for map markers.
    pub async fn located_suppliers(&self) -> EngineResult<Vec<SupplierSummary>> {
        let docs = self.store.list_all(SUPPLIERS).await?;

        Ok(docs
            .iter()
            .filter_map(|doc| match doc.decode::<Supplier>() {
                Ok(s) => Some(s),
                Err(e) => {
                    warn!(supplier_id = %doc.id, error = %e, "Skipping malformed supplier");
                    None
                }
            })
            .filter(|s| s.business_coordinate.is_some())
            .map(|s| SupplierSummary::from(&s))
            .collect())
    }

    // =========================================================================
    // Enrichment
    // =========================================================================

    async fn load_vehicles(&self) -> EngineResult<Vec<Vehicle>> {
        let docs = self.store.list_all(VEHICLES).await?;

        Ok(docs
            .iter()
            .filter_map(|doc| match doc.decode::<Vehicle>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(vehicle_id = %doc.id, error = %e, "Skipping malformed vehicle");
                    None
                }
            })
            .collect())
    }

    /// Enriches in input order with bounded concurrency.
    async fn enrich_all(
        &self,
        vehicles: Vec<Vehicle>,
        reference: Option<GeoCoordinate>,
        favorites: &HashSet<String>,
    ) -> EngineResult<Vec<VehicleViewModel>> {
        stream::iter(vehicles.into_iter().map(|vehicle| {
            let is_favorite = favorites.contains(&vehicle.id);
            self.enrich(vehicle, reference, is_favorite)
        }))
        .buffered(self.concurrency)
        .try_collect()
        .await
    }

    async fn enrich(
        &self,
        vehicle: Vehicle,
        reference: Option<GeoCoordinate>,
        is_favorite: bool,
    ) -> EngineResult<VehicleViewModel> {
        let supplier_branch = async {
            let supplier = self.supplier_summary(&vehicle.owner_id).await?;
            let distance = distance_between(reference, supplier.business_coordinate);
            Ok::<_, EngineError>((supplier, distance))
        };

        let ((supplier, distance_km), vehicle_rating, supplier_rating) = tokio::try_join!(
            supplier_branch,
            self.rating_summary(RatingTarget::Vehicle, &vehicle.id),
            self.rating_summary(RatingTarget::Supplier, &vehicle.owner_id),
        )?;

        Ok(VehicleViewModel {
            vehicle,
            supplier,
            vehicle_rating,
            supplier_rating,
            distance_km,
            is_favorite,
        })
    }

    async fn supplier_summary(&self, supplier_id: &str) -> EngineResult<SupplierSummary> {
        let Some(doc) = self.store.get_by_id(SUPPLIERS, supplier_id).await? else {
            warn!(supplier_id = %supplier_id, "Supplier not found, using placeholder");
            return Ok(SupplierSummary::unknown());
        };

        match doc.decode::<Supplier>() {
            Ok(supplier) => Ok(SupplierSummary::from(&supplier)),
            Err(e) => {
                warn!(supplier_id = %supplier_id, error = %e, "Malformed supplier, using placeholder");
                Ok(SupplierSummary::unknown())
            }
        }
    }

    async fn rating_summary(
        &self,
        target: RatingTarget,
        target_id: &str,
    ) -> EngineResult<RatingSummary> {
        let docs = self
            .store
            .query_by_field(RATINGS, "target_id", &Value::from(target_id))
            .await?;

        let ratings: Vec<Rating> = docs
            .iter()
            .filter_map(|doc| match doc.decode::<Rating>() {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(rating_id = %doc.id, error = %e, "Skipping malformed rating");
                    None
                }
            })
            .filter(|r| r.target_type == target)
            .collect();

        Ok(RatingSummary::from_ratings(&ratings))
    }
}
