//! # Domain Types
//!
//! Core domain records used throughout RideHub.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐ owns  ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    Supplier     │──────►│     Vehicle     │◄──│     Booking     │   │
//! │  │  ─────────────  │  0..n │  ─────────────  │   │  ─────────────  │   │
//! │  │  business_name  │       │  category       │   │  renter_id      │   │
//! │  │  coordinate     │       │  displacement   │   │  pickup/return  │   │
//! │  │  verified       │       │  price_per_day  │   │  status, rated  │   │
//! │  └────────▲────────┘       └────────▲────────┘   └────────┬────────┘   │
//! │           │                         │                     │            │
//! │           │      ┌──────────────────┴─┐                   │ on         │
//! │           └──────│      Rating        │◄──────────────────┘ completion │
//! │   target=Supplier│  score 1..=5       │ target=Vehicle                 │
//! │                  └────────────────────┘                                │
//! │                                                                         │
//! │  Favorite: (renter_id, vehicle_id); presence is membership             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A vehicle has no coordinate of its own; its location is the owning
//! supplier's business coordinate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::rating::RatingSummary;
use crate::UNKNOWN_SUPPLIER_NAME;

// =============================================================================
// Geo Coordinate
// =============================================================================

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        GeoCoordinate {
            latitude,
            longitude,
        }
    }
}

// =============================================================================
// Vehicle
// =============================================================================

/// Wheel class of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    /// Scooters and motorcycles.
    TwoWheel,
    /// Cars.
    FourWheel,
}

/// A rentable listing. Created and edited by suppliers outside this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vehicle {
    pub id: String,

    /// Display name, e.g. "Honda Click 125i".
    pub name: String,

    #[serde(default)]
    pub brand: Option<String>,

    pub category: VehicleCategory,

    /// Engine displacement in cc.
    pub displacement_cc: u32,

    /// Daily rate in centavos.
    pub price_per_day: Money,

    /// Ordered image URIs; the first is the cover image.
    #[serde(default)]
    pub images: Vec<String>,

    /// Owning supplier.
    pub owner_id: String,
}

impl Vehicle {
    /// Returns the cover image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// The business that owns and lists vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub business_name: String,
    #[serde(default)]
    pub business_address: Option<String>,
    #[serde(default)]
    pub business_coordinate: Option<GeoCoordinate>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub business_email: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    /// Profile image URI.
    #[serde(default)]
    pub business_profile: Option<String>,
}

/// The supplier fields exposed on a listing.
///
/// When the owning supplier record is missing, [`SupplierSummary::unknown`]
/// stands in so the listing itself still shows up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierSummary {
    /// `None` for the sentinel.
    pub supplier_id: Option<String>,
    pub business_name: String,
    pub business_address: Option<String>,
    pub business_coordinate: Option<GeoCoordinate>,
    pub verified: bool,
    pub business_email: Option<String>,
    pub contact_number: Option<String>,
    pub business_profile: Option<String>,
}

impl SupplierSummary {
    /// Sentinel for a listing whose supplier record does not exist.
    pub fn unknown() -> Self {
        SupplierSummary {
            supplier_id: None,
            business_name: UNKNOWN_SUPPLIER_NAME.to_string(),
            business_address: None,
            business_coordinate: None,
            verified: false,
            business_email: None,
            contact_number: None,
            business_profile: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.supplier_id.is_none()
    }
}

impl From<&Supplier> for SupplierSummary {
    fn from(s: &Supplier) -> Self {
        SupplierSummary {
            supplier_id: Some(s.id.clone()),
            business_name: s.business_name.clone(),
            business_address: s.business_address.clone(),
            business_coordinate: s.business_coordinate,
            verified: s.verified,
            business_email: s.business_email.clone(),
            contact_number: s.contact_number.clone(),
            business_profile: s.business_profile.clone(),
        }
    }
}

// =============================================================================
// Rating
// =============================================================================

/// What a rating is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RatingTarget {
    Vehicle,
    Supplier,
}

impl RatingTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingTarget::Vehicle => "vehicle",
            RatingTarget::Supplier => "supplier",
        }
    }
}

/// A post-completion review. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rating {
    pub id: String,
    pub target_type: RatingTarget,
    pub target_id: String,
    pub booking_id: String,
    /// 1..=5
    pub score: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub author_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle status of a booking.
///
/// ```text
/// Pending ──confirm──► OnGoing ──complete──► Complete
///    │                    │
///    └──cancel──► Cancelled ◄──cancel──┘
/// ```
///
/// Older records spelled Pending as `"Confirmed"` and Cancelled as
/// `"Cancel"`; both still deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BookingStatus {
    #[default]
    #[serde(alias = "Confirmed")]
    Pending,
    #[serde(rename = "On-Going")]
    OnGoing,
    Complete,
    #[serde(alias = "Cancel")]
    Cancelled,
}

impl BookingStatus {
    /// The string written to documents (and used in field queries).
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::OnGoing => "On-Going",
            BookingStatus::Complete => "Complete",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Complete and Cancelled accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Complete | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Booking
// =============================================================================

/// One renter's reservation of one vehicle.
///
/// `price_per_day` and `rental_days` are frozen at creation, so the total
/// stays explainable even if the listing price changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Booking {
    pub id: String,
    pub vehicle_id: String,
    pub renter_id: String,
    #[ts(as = "String")]
    pub pickup_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub return_at: DateTime<Utc>,
    /// Vehicle rate at booking time (frozen).
    pub price_per_day: Money,
    /// Inclusive day count between pickup and return dates (frozen).
    pub rental_days: u32,
    /// `price_per_day × rental_days`.
    pub total_price: Money,
    pub status: BookingStatus,
    #[serde(default)]
    pub rated: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Favorite
// =============================================================================

/// A renter-scoped bookmark on a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Favorite {
    pub renter_id: String,
    pub vehicle_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Deterministic document key for the (renter, vehicle) pair.
    ///
    /// The renter id is length-prefixed so ids containing `:` cannot
    /// collide: `("a:b", "c")` and `("a", "b:c")` get distinct keys.
    pub fn key(renter_id: &str, vehicle_id: &str) -> String {
        format!("{}:{}:{}", renter_id.len(), renter_id, vehicle_id)
    }
}

// =============================================================================
// Vehicle View Model
// =============================================================================

/// A listing as shown on the dashboard: the vehicle joined with its
/// supplier, both rating aggregates, distance and favorite state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VehicleViewModel {
    pub vehicle: Vehicle,
    pub supplier: SupplierSummary,
    pub vehicle_rating: RatingSummary,
    pub supplier_rating: RatingSummary,
    /// `None` when no reference location was given or the supplier has no
    /// coordinate.
    pub distance_km: Option<f64>,
    pub is_favorite: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
