//! Discovery, favorites and supplier markers against the in-memory store.

mod common;

use std::sync::Arc;

use common::*;
use ridehub_core::filter::{DiscoveryFilter, SortOrder, ValueRange};
use ridehub_core::{GeoCoordinate, Money, RatingTarget, VehicleCategory, UNKNOWN_SUPPLIER_NAME};
use ridehub_engine::collections::{FAVORITES, RATINGS, VEHICLES};
use ridehub_engine::EngineError;
use ridehub_store::DocumentStore;

const ORIGIN: GeoCoordinate = GeoCoordinate::new(10.3157, 123.8854);

fn ids(results: &[ridehub_core::VehicleViewModel]) -> Vec<&str> {
    results.iter().map(|vm| vm.vehicle.id.as_str()).collect()
}

/// V1: ₱400/day rated 4.2. V2: ₱900/day rated 2.0.
async fn price_and_rating_fixture() -> Arc<ridehub_store::MemoryStore> {
    let store = memory_store();
    put_supplier(&*store, &supplier("s1", Some(ORIGIN))).await;
    put_vehicle(&*store, &vehicle("V1", "s1", 400)).await;
    put_vehicle(&*store, &vehicle("V2", "s1", 900)).await;
    for score in [5, 4, 4, 4, 4] {
        put_rating(&*store, RatingTarget::Vehicle, "V1", score).await;
    }
    put_rating(&*store, RatingTarget::Vehicle, "V2", 2).await;
    store
}

/// near: 5 km, far: 20 km, nowhere: supplier without a location.
async fn distance_fixture() -> Arc<ridehub_store::MemoryStore> {
    let store = memory_store();
    put_supplier(&*store, &supplier("s-near", Some(north_of(ORIGIN, 5.0)))).await;
    put_supplier(&*store, &supplier("s-far", Some(north_of(ORIGIN, 20.0)))).await;
    put_supplier(&*store, &supplier("s-nowhere", None)).await;
    put_vehicle(&*store, &vehicle("far", "s-far", 500)).await;
    put_vehicle(&*store, &vehicle("near", "s-near", 500)).await;
    put_vehicle(&*store, &vehicle("nowhere", "s-nowhere", 500)).await;
    store
}

// =============================================================================
// Filters
// =============================================================================

#[tokio::test]
async fn test_price_range_filter() {
    let engine = signed_in_engine(price_and_rating_fixture().await);
    let filter = DiscoveryFilter::new()
        .with_price(ValueRange::new(Money::zero(), Money::from_major(500)).unwrap());

    let results = engine.discover(None, &filter, None).await.unwrap();
    assert_eq!(ids(&results), vec!["V1"]);
}

#[tokio::test]
async fn test_vehicle_rating_range_filter() {
    let engine = signed_in_engine(price_and_rating_fixture().await);
    let filter = DiscoveryFilter::new().with_vehicle_rating(ValueRange::new(4.0, 5.0).unwrap());

    let results = engine.discover(None, &filter, None).await.unwrap();
    assert_eq!(ids(&results), vec!["V1"]);
    assert!((results[0].vehicle_rating.average - 4.2).abs() < 1e-9);
    assert_eq!(results[0].vehicle_rating.count, 5);
}

#[tokio::test]
async fn test_supplier_rating_range_filter() {
    let store = memory_store();
    put_supplier(&*store, &supplier("good", None)).await;
    put_supplier(&*store, &supplier("poor", None)).await;
    // Same price, same vehicle rating: only the supplier rating differs.
    put_vehicle(&*store, &vehicle("G1", "good", 500)).await;
    put_vehicle(&*store, &vehicle("P1", "poor", 500)).await;
    for id in ["G1", "P1"] {
        put_rating(&*store, RatingTarget::Vehicle, id, 4).await;
    }
    for score in [5, 4, 5] {
        put_rating(&*store, RatingTarget::Supplier, "good", score).await;
    }
    put_rating(&*store, RatingTarget::Supplier, "poor", 2).await;
    let engine = signed_in_engine(store);

    let filter = DiscoveryFilter::new().with_supplier_rating(ValueRange::new(4.0, 5.0).unwrap());
    let results = engine.discover(None, &filter, None).await.unwrap();
    assert_eq!(ids(&results), vec!["G1"]);
    assert!((results[0].supplier_rating.average - 14.0 / 3.0).abs() < 1e-9);
    assert_eq!(results[0].supplier_rating.count, 3);

    let low = DiscoveryFilter::new().with_supplier_rating(ValueRange::new(1.0, 2.5).unwrap());
    let results = engine.discover(None, &low, None).await.unwrap();
    assert_eq!(ids(&results), vec!["P1"]);
}

#[tokio::test]
async fn test_no_filter_returns_everything() {
    let engine = signed_in_engine(price_and_rating_fixture().await);
    let results = engine.discover(None, &DiscoveryFilter::new(), None).await.unwrap();
    assert_eq!(ids(&results), vec!["V1", "V2"]);
}

#[tokio::test]
async fn test_category_and_name_filters() {
    let store = price_and_rating_fixture().await;
    let mut car = vehicle("C1", "s1", 1800);
    car.name = "Toyota Vios".to_string();
    car.category = VehicleCategory::FourWheel;
    car.displacement_cc = 1300;
    put_vehicle(&*store, &car).await;
    let engine = signed_in_engine(store);

    let four_wheel = DiscoveryFilter::new().with_category(VehicleCategory::FourWheel);
    let results = engine.discover(None, &four_wheel, None).await.unwrap();
    assert_eq!(ids(&results), vec!["C1"]);

    let by_name = DiscoveryFilter::new().with_name_query("  vIoS ");
    let results = engine.discover(None, &by_name, None).await.unwrap();
    assert_eq!(ids(&results), vec!["C1"]);

    let big_engine = DiscoveryFilter::new()
        .with_displacement(ValueRange::parse_preset("1000-2000").unwrap().unwrap());
    let results = engine.discover(None, &big_engine, None).await.unwrap();
    assert_eq!(ids(&results), vec!["C1"]);
}

// =============================================================================
// Distance sort
// =============================================================================

#[tokio::test]
async fn test_nearest_and_farthest_ordering() {
    let engine = signed_in_engine(distance_fixture().await);

    let nearest = DiscoveryFilter::new().with_sort_order(SortOrder::Nearest);
    let results = engine.discover(Some(ORIGIN), &nearest, None).await.unwrap();
    assert_eq!(ids(&results), vec!["near", "far", "nowhere"]);

    let near_km = results[0].distance_km.unwrap();
    let far_km = results[1].distance_km.unwrap();
    assert!((near_km - 5.0).abs() < 0.01);
    assert!((far_km - 20.0).abs() < 0.01);
    assert_eq!(results[2].distance_km, None);

    let farthest = DiscoveryFilter::new().with_sort_order(SortOrder::Farthest);
    let results = engine.discover(Some(ORIGIN), &farthest, None).await.unwrap();
    assert_eq!(ids(&results), vec!["nowhere", "far", "near"]);
}

#[tokio::test]
async fn test_no_reference_means_no_distance() {
    let engine = signed_in_engine(distance_fixture().await);
    let results = engine.discover(None, &DiscoveryFilter::new(), None).await.unwrap();
    assert!(results.iter().all(|vm| vm.distance_km.is_none()));
}

#[tokio::test]
async fn test_rerun_is_a_fresh_snapshot() {
    let store = distance_fixture().await;
    let engine = signed_in_engine(store.clone());
    let filter = DiscoveryFilter::new().with_sort_order(SortOrder::Nearest);

    let first = engine.discover(Some(ORIGIN), &filter, None).await.unwrap();
    let second = engine.discover(Some(ORIGIN), &filter, None).await.unwrap();
    assert_eq!(first, second);

    store.delete(VEHICLES, "far").await.unwrap();
    let third = engine.discover(Some(ORIGIN), &filter, None).await.unwrap();
    assert_eq!(ids(&third), vec!["near", "nowhere"]);
}

// =============================================================================
// Degraded enrichment
// =============================================================================

#[tokio::test]
async fn test_missing_supplier_uses_placeholder() {
    let store = memory_store();
    put_vehicle(&*store, &vehicle("orphan", "deleted-supplier", 300)).await;
    let engine = signed_in_engine(store);

    let results = engine
        .discover(Some(ORIGIN), &DiscoveryFilter::new(), None)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    let vm = &results[0];
    assert_eq!(vm.supplier.business_name, UNKNOWN_SUPPLIER_NAME);
    assert!(vm.supplier.is_unknown());
    assert_eq!(vm.distance_km, None);
    assert_eq!(vm.vehicle_rating.count, 0);
    assert_eq!(vm.vehicle_rating.average, 0.0);
}

#[tokio::test]
async fn test_store_outage_fails_discovery() {
    let store = distance_fixture().await;
    let engine = signed_in_engine(store.clone());
    store.set_available(false);

    let err = engine
        .discover(None, &DiscoveryFilter::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::StoreUnavailable(_)));
}

#[tokio::test]
async fn test_rating_outage_fails_discovery() {
    let store = Arc::new(FlakyStore::new(Some(RATINGS)));
    put_supplier(&store.inner, &supplier("s1", Some(ORIGIN))).await;
    put_vehicle(&store.inner, &vehicle("v1", "s1", 500)).await;
    let engine = signed_in_engine(store);

    let err = engine
        .discover(None, &DiscoveryFilter::new(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "STORE_UNAVAILABLE");
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn test_toggle_twice_restores_state() {
    let store = distance_fixture().await;
    let engine = signed_in_engine(store.clone());

    assert!(engine.toggle_favorite(RENTER, "near").await.unwrap());
    assert_eq!(store.count(FAVORITES).await, 1);

    assert!(!engine.toggle_favorite(RENTER, "near").await.unwrap());
    assert_eq!(store.count(FAVORITES).await, 0);

    assert!(engine.toggle_favorite(RENTER, "near").await.unwrap());
    assert_eq!(store.count(FAVORITES).await, 1);
}

#[tokio::test]
async fn test_concurrent_toggles_leave_one_state() {
    let store = distance_fixture().await;
    let engine = Arc::new(signed_in_engine(store.clone()));

    let a = engine.toggle_favorite(RENTER, "far");
    let b = engine.toggle_favorite(RENTER, "far");
    let (a, b) = tokio::join!(a, b);
    a.unwrap();
    b.unwrap();

    assert!(store.count(FAVORITES).await <= 1);
}

#[tokio::test]
async fn test_is_favorite_is_relative_to_renter() {
    let engine = signed_in_engine(distance_fixture().await);
    engine.toggle_favorite(RENTER, "far").await.unwrap();

    let mine = engine
        .discover(None, &DiscoveryFilter::new(), Some(RENTER))
        .await
        .unwrap();
    let flagged: Vec<&str> = mine
        .iter()
        .filter(|vm| vm.is_favorite)
        .map(|vm| vm.vehicle.id.as_str())
        .collect();
    assert_eq!(flagged, vec!["far"]);

    let anonymous = engine.discover(None, &DiscoveryFilter::new(), None).await.unwrap();
    assert!(anonymous.iter().all(|vm| !vm.is_favorite));

    let other = engine
        .discover(None, &DiscoveryFilter::new(), Some("renter-2"))
        .await
        .unwrap();
    assert!(other.iter().all(|vm| !vm.is_favorite));
}

#[tokio::test]
async fn test_favorites_list_skips_deleted_vehicles() {
    let store = distance_fixture().await;
    let engine = signed_in_engine(store.clone());
    engine.toggle_favorite(RENTER, "near").await.unwrap();
    engine.toggle_favorite(RENTER, "far").await.unwrap();
    store.delete(VEHICLES, "far").await.unwrap();

    let favorites = engine.favorites(RENTER, Some(ORIGIN)).await.unwrap();
    assert_eq!(ids(&favorites), vec!["near"]);
    assert!(favorites[0].is_favorite);
    assert!(favorites[0].distance_km.is_some());
}

#[tokio::test]
async fn test_located_suppliers() {
    let engine = signed_in_engine(distance_fixture().await);
    let mut located: Vec<String> = engine
        .located_suppliers()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|s| s.supplier_id)
        .collect();
    located.sort();
    assert_eq!(located, vec!["s-far", "s-near"]);
}
