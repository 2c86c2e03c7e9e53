//! # Discovery Filter
//!
//! The explicit set of predicates and the distance sort applied to enriched
//! listings.
//!
//! ## Predicate Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  VehicleViewModel                                                       │
//! │     │                                                                   │
//! │     ├─ category          ──┐                                            │
//! │     ├─ displacement (cc)   │                                            │
//! │     ├─ price per day       │  AND-combined, each skipped when unset     │
//! │     ├─ vehicle rating      │                                            │
//! │     ├─ supplier rating     │                                            │
//! │     └─ name substring    ──┘                                            │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │        sort by distance_km (none / nearest / farthest)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Range bounds are inclusive on both ends and come from the dashboard's
//! preset strings (`"100-150"`, `"0-300"`, `"4-5"`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{VehicleCategory, VehicleViewModel};

// =============================================================================
// Value Range
// =============================================================================

/// Inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy + Display> ValueRange<T> {
    pub fn new(min: T, max: T) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::invalid_format(
                "range",
                format!("min {} is greater than max {}", min, max),
            ));
        }
        Ok(ValueRange { min, max })
    }

    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

impl<T> ValueRange<T>
where
    T: FromStr + PartialOrd + Copy + Display,
{
    /// Parses a picker value. Placeholders such as `"Select Price Range"`
    /// and empty strings mean no constraint.
    pub fn parse_preset(s: &str) -> Result<Option<Self>, ValidationError> {
        let s = s.trim();
        if s.is_empty() || s.starts_with("Select") {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl<T> FromStr for ValueRange<T>
where
    T: FromStr + PartialOrd + Copy + Display,
{
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::invalid_format("range", format!("'{}' is not 'min-max'", s));

        let (min, max) = s.trim().split_once('-').ok_or_else(invalid)?;
        let min: T = min.trim().parse().map_err(|_| invalid())?;
        let max: T = max.trim().parse().map_err(|_| invalid())?;
        ValueRange::new(min, max)
    }
}

// =============================================================================
// Sort Order
// =============================================================================

/// Distance ordering of discovery results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep load order.
    #[default]
    None,
    /// Ascending distance; unlocated listings last.
    Nearest,
    /// Descending distance; unlocated listings first.
    Farthest,
}

/// Stable in-place sort by `distance_km`.
pub fn sort_by_distance(items: &mut [VehicleViewModel], order: SortOrder) {
    match order {
        SortOrder::None => {}
        SortOrder::Nearest => items.sort_by(|a, b| nearest_first(a.distance_km, b.distance_km)),
        SortOrder::Farthest => items.sort_by(|a, b| farthest_first(a.distance_km, b.distance_km)),
    }
}

fn nearest_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn farthest_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

// =============================================================================
// Discovery Filter
// =============================================================================

/// Every recognized discovery constraint. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct DiscoveryFilter {
    pub category: Option<VehicleCategory>,
    pub displacement: Option<ValueRange<u32>>,
    pub price: Option<ValueRange<Money>>,
    pub vehicle_rating: Option<ValueRange<f64>>,
    pub supplier_rating: Option<ValueRange<f64>>,
    /// Case-insensitive substring of the vehicle name.
    pub name_query: Option<String>,
    pub sort_order: SortOrder,
}

impl DiscoveryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: VehicleCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_displacement(mut self, range: ValueRange<u32>) -> Self {
        self.displacement = Some(range);
        self
    }

    pub fn with_price(mut self, range: ValueRange<Money>) -> Self {
        self.price = Some(range);
        self
    }

    pub fn with_vehicle_rating(mut self, range: ValueRange<f64>) -> Self {
        self.vehicle_rating = Some(range);
        self
    }

    pub fn with_supplier_rating(mut self, range: ValueRange<f64>) -> Self {
        self.supplier_rating = Some(range);
        self
    }

    pub fn with_name_query(mut self, query: impl Into<String>) -> Self {
        self.name_query = Some(query.into());
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// True when the listing passes every set predicate.
    pub fn matches(&self, vm: &VehicleViewModel) -> bool {
        let v = &vm.vehicle;

        if self.category.is_some_and(|c| v.category != c) {
            return false;
        }
        if self.displacement.is_some_and(|r| !r.contains(v.displacement_cc)) {
            return false;
        }
        if self.price.is_some_and(|r| !r.contains(v.price_per_day)) {
            return false;
        }
        if self.vehicle_rating.is_some_and(|r| !r.contains(vm.vehicle_rating.average)) {
            return false;
        }
        if self.supplier_rating.is_some_and(|r| !r.contains(vm.supplier_rating.average)) {
            return false;
        }
        if let Some(needle) = self.normalized_query() {
            if !v.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    /// Filters then sorts.
    pub fn apply(&self, items: Vec<VehicleViewModel>) -> Vec<VehicleViewModel> {
        let mut kept: Vec<VehicleViewModel> = items.into_iter().filter(|vm| self.matches(vm)).collect();
        sort_by_distance(&mut kept, self.sort_order);
        kept
    }

    fn normalized_query(&self) -> Option<String> {
        self.name_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RatingSummary;
    use crate::types::{SupplierSummary, Vehicle};

    fn listing(id: &str, name: &str, price: i64, rating: f64, distance: Option<f64>) -> VehicleViewModel {
        VehicleViewModel {
            vehicle: Vehicle {
                id: id.to_string(),
                name: name.to_string(),
                brand: None,
                category: VehicleCategory::TwoWheel,
                displacement_cc: 125,
                price_per_day: Money::from_major(price),
                images: vec![],
                owner_id: "sup-1".to_string(),
            },
            supplier: SupplierSummary::unknown(),
            vehicle_rating: RatingSummary { average: rating, count: 1 },
            supplier_rating: RatingSummary::EMPTY,
            distance_km: distance,
            is_favorite: false,
        }
    }

    fn ids(items: &[VehicleViewModel]) -> Vec<&str> {
        items.iter().map(|vm| vm.vehicle.id.as_str()).collect()
    }

    #[test]
    fn test_parse_presets() {
        let r: ValueRange<u32> = "100-150".parse().unwrap();
        assert_eq!((r.min, r.max), (100, 150));
        assert!(r.contains(100) && r.contains(150) && !r.contains(151));

        let p: ValueRange<Money> = "0-300".parse().unwrap();
        assert_eq!(p.max, Money::from_major(300));

        let s: ValueRange<f64> = "4-5".parse().unwrap();
        assert!(s.contains(4.2));

        assert!(ValueRange::<u32>::parse_preset("Select Displacement").unwrap().is_none());
        assert!(ValueRange::<u32>::parse_preset("").unwrap().is_none());
        assert!("150-100".parse::<ValueRange<u32>>().is_err());
        assert!("abc".parse::<ValueRange<u32>>().is_err());
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let items = vec![listing("a", "Click", 400, 4.2, None), listing("b", "Aerox", 900, 2.0, None)];
        assert_eq!(ids(&DiscoveryFilter::new().apply(items)), vec!["a", "b"]);
    }

    #[test]
    fn test_price_and_rating_filters_are_independent() {
        let items = || vec![listing("V1", "Click", 400, 4.2, None), listing("V2", "Aerox", 900, 2.0, None)];

        let by_price = DiscoveryFilter::new().with_price("0-500".parse().unwrap());
        assert_eq!(ids(&by_price.apply(items())), vec!["V1"]);

        let by_rating = DiscoveryFilter::new().with_vehicle_rating("4-5".parse().unwrap());
        assert_eq!(ids(&by_rating.apply(items())), vec!["V1"]);
    }

    #[test]
    fn test_supplier_rating_filter_alone() {
        let mut trusted = listing("T", "Click", 500, 3.0, None);
        trusted.supplier_rating = RatingSummary { average: 4.6, count: 8 };
        let mut shaky = listing("S", "Click", 500, 3.0, None);
        shaky.supplier_rating = RatingSummary { average: 1.5, count: 2 };
        let unrated = listing("U", "Click", 500, 3.0, None);
        let items = || vec![trusted.clone(), shaky.clone(), unrated.clone()];

        let f = DiscoveryFilter::new().with_supplier_rating("4-5".parse().unwrap());
        assert_eq!(ids(&f.apply(items())), vec!["T"]);

        // Unrated suppliers average 0.
        let low = DiscoveryFilter::new().with_supplier_rating("0-2".parse().unwrap());
        assert_eq!(ids(&low.apply(items())), vec!["S", "U"]);
    }

    #[test]
    fn test_name_query_is_trimmed_and_case_insensitive() {
        let items = || vec![listing("a", "Honda Click 125i", 400, 0.0, None), listing("b", "Yamaha NMAX", 600, 0.0, None)];

        let f = DiscoveryFilter::new().with_name_query("  click ");
        assert_eq!(ids(&f.apply(items())), vec!["a"]);

        let blank = DiscoveryFilter::new().with_name_query("   ");
        assert_eq!(blank.apply(items()).len(), 2);
    }

    #[test]
    fn test_category_filter() {
        let mut car = listing("car", "Vios", 1500, 0.0, None);
        car.vehicle.category = VehicleCategory::FourWheel;
        let items = vec![listing("moto", "Click", 400, 0.0, None), car];

        let f = DiscoveryFilter::new().with_category(VehicleCategory::FourWheel);
        assert_eq!(ids(&f.apply(items)), vec!["car"]);
    }

    #[test]
    fn test_distance_sort() {
        let items = || {
            vec![
                listing("far", "A", 500, 0.0, Some(20.0)),
                listing("nowhere", "B", 500, 0.0, None),
                listing("near", "C", 500, 0.0, Some(5.0)),
            ]
        };

        let nearest = DiscoveryFilter::new().with_sort_order(SortOrder::Nearest);
        assert_eq!(ids(&nearest.apply(items())), vec!["near", "far", "nowhere"]);

        let farthest = DiscoveryFilter::new().with_sort_order(SortOrder::Farthest);
        assert_eq!(ids(&farthest.apply(items())), vec!["nowhere", "far", "near"]);

        let none = DiscoveryFilter::new();
        assert_eq!(ids(&none.apply(items())), vec!["far", "nowhere", "near"]);
    }

    #[test]
    fn test_filter_deserializes_with_missing_fields() {
        let f: DiscoveryFilter = serde_json::from_str(r#"{"sort_order":"nearest"}"#).unwrap();
        assert_eq!(f.sort_order, SortOrder::Nearest);
        assert!(f.price.is_none());
    }
}
