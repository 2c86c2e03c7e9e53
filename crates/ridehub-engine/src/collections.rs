//! Collection names in the document store.

pub const VEHICLES: &str = "vehicles";
pub const SUPPLIERS: &str = "suppliers";
pub const RATINGS: &str = "ratings";
pub const BOOKINGS: &str = "bookings";

/// Back-references `{renter_id, booking_id, created_at}` keyed by booking id.
pub const RENTER_BOOKINGS: &str = "renter_bookings";

/// Keyed by `Favorite::key(renter_id, vehicle_id)`.
pub const FAVORITES: &str = "favorites";
