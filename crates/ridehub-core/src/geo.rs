//! # Geo Math
//!
//! Great-circle distance between two coordinates (Haversine).
//!
//! ```text
//! a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)
//! c = 2 · atan2(√a, √(1−a))
//! d = R · c            R = 6371 km
//! ```

use crate::types::GeoCoordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Returns the great-circle distance in kilometres between `a` and `b`.
///
/// Symmetric, and zero for identical points.
///
/// ## Example
/// ```rust
/// use ridehub_core::geo::distance_km;
/// use ridehub_core::GeoCoordinate;
///
/// let manila = GeoCoordinate::new(14.5995, 120.9842);
/// let cebu = GeoCoordinate::new(10.3157, 123.8854);
/// let d = distance_km(manila, cebu);
/// assert!((d - 571.0).abs() < 5.0);
/// ```
pub fn distance_km(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points.
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance from an optional reference point to an optional target.
///
/// `None` unless both coordinates are known.
pub fn distance_between(
    reference: Option<GeoCoordinate>,
    target: Option<GeoCoordinate>,
) -> Option<f64> {
    match (reference, target) {
        (Some(r), Some(t)) => Some(distance_km(r, t)),
        _ => None,
    }
}
