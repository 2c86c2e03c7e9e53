//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use ridehub_core::{
    GeoCoordinate, Money, Rating, RatingTarget, Supplier, Vehicle, VehicleCategory,
};
use ridehub_engine::collections::{RATINGS, SUPPLIERS, VEHICLES};
use ridehub_engine::{EngineConfig, RentalEngine, StaticIdentity};
use ridehub_store::{
    generate_id, to_data, Document, DocumentStore, MemoryStore, StoreError, StoreResult,
    WriteBatch,
};
use serde_json::Value;

pub const RENTER: &str = "renter-1";

pub fn engine_for(store: Arc<dyn DocumentStore>, identity: StaticIdentity) -> RentalEngine {
    let mut config = EngineConfig::default();
    config.booking.utc_offset_minutes = 480;
    config.discovery.enrichment_concurrency = 4;
    RentalEngine::new(store, Arc::new(identity), &config).unwrap()
}

pub fn signed_in_engine(store: Arc<dyn DocumentStore>) -> RentalEngine {
    engine_for(store, StaticIdentity::signed_in(RENTER))
}

pub fn vehicle(id: &str, owner: &str, price: i64) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        name: format!("Vehicle {}", id),
        brand: None,
        category: VehicleCategory::TwoWheel,
        displacement_cc: 125,
        price_per_day: Money::from_major(price),
        images: vec![format!("https://img.example/{}.jpg", id)],
        owner_id: owner.to_string(),
    }
}

pub fn supplier(id: &str, coord: Option<GeoCoordinate>) -> Supplier {
    Supplier {
        id: id.to_string(),
        business_name: format!("Supplier {}", id),
        business_address: Some("Cebu City".to_string()),
        business_coordinate: coord,
        verified: true,
        business_email: None,
        contact_number: None,
        business_profile: None,
    }
}

pub async fn put_vehicle<S: DocumentStore + ?Sized>(store: &S, v: &Vehicle) {
    store.set(VEHICLES, &v.id, to_data(v).unwrap()).await.unwrap();
}

pub async fn put_supplier<S: DocumentStore + ?Sized>(store: &S, s: &Supplier) {
    store.set(SUPPLIERS, &s.id, to_data(s).unwrap()).await.unwrap();
}

pub async fn put_rating<S: DocumentStore + ?Sized>(
    store: &S,
    target: RatingTarget,
    target_id: &str,
    score: u8,
) {
    let rating = Rating {
        id: generate_id(),
        target_type: target,
        target_id: target_id.to_string(),
        booking_id: generate_id(),
        score,
        comment: None,
        author_id: "someone".to_string(),
        created_at: Utc::now(),
    };
    store
        .set(RATINGS, &rating.id, to_data(&rating).unwrap())
        .await
        .unwrap();
}

/// A point roughly `km` kilometres north of `origin`.
pub fn north_of(origin: GeoCoordinate, km: f64) -> GeoCoordinate {
    let degrees = km / (ridehub_core::geo::EARTH_RADIUS_KM * std::f64::consts::PI / 180.0);
    GeoCoordinate::new(origin.latitude + degrees, origin.longitude)
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Wraps a [`MemoryStore`] and fails selected calls with `Unavailable`.
pub struct FlakyStore {
    pub inner: MemoryStore,
    /// Fail every `query_by_field` against this collection.
    pub failing_query: Option<&'static str>,
    pub fail_commits: AtomicBool,
}

impl FlakyStore {
    pub fn new(failing_query: Option<&'static str>) -> Self {
        FlakyStore {
            inner: MemoryStore::new(),
            failing_query,
            fail_commits: AtomicBool::new(false),
        }
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.inner.get_by_id(collection, id).await
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        if self.failing_query == Some(collection) {
            return Err(StoreError::Unavailable(format!("{} offline", collection)));
        }
        self.inner.query_by_field(collection, field, value).await
    }

    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.inner.list_all(collection).await
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("commit dropped".to_string()));
        }
        self.inner.commit(batch).await
    }
}
