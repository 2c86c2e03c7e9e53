//! # Booking Lifecycle
//!
//! Creates bookings, moves them through the state machine, and records the
//! renter's rating pair once a rental is complete.
//!
//! ## Write Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_booking                                                         │
//! │    identity == renter? ─► load vehicle ─► resolve window + quote       │
//! │    batch: create bookings/{id} + create renter_bookings/{id}           │
//! │                                                                         │
//! │  confirm / mark_complete / cancel                                       │
//! │    load ─► state machine ─► batch: expect status == from               │
//! │                                    update {status, updated_at}         │
//! │                                                                         │
//! │  submit_rating                                                          │
//! │    batch: expect status == Complete                                    │
//! │           expect rated == false                                        │
//! │           create ratings/{vehicle}, ratings/{supplier}                 │
//! │           update rated = true                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write is a single batch, so a lost race surfaces as a failed
//! precondition instead of a half-applied change.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use ridehub_core::booking::{self as rules, BookingAction, BookingTab};
use ridehub_core::datetime::{ClockTime, DateTimeResolver};
use ridehub_core::validation::{validate_comment, validate_id, validate_score};
use ridehub_core::{Booking, BookingStatus, Rating, RatingTarget, ValidationError, Vehicle};
use ridehub_store::{generate_id, to_data, Document, DocumentStore, StoreError, WriteBatch};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::collections::{BOOKINGS, RATINGS, RENTER_BOOKINGS, VEHICLES};
use crate::error::{EngineError, EngineResult};
use crate::identity::{require_user, IdentityProvider};

// =============================================================================
// Requests
// =============================================================================

/// Everything needed to book a vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub vehicle_id: String,
    pub renter_id: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub pickup_time: ClockTime,
    pub return_time: ClockTime,
}

impl BookingRequest {
    /// Builds a request from picker strings (`"2024-01-01"`, `"10:00 AM"`).
    pub fn parse(
        vehicle_id: impl Into<String>,
        renter_id: impl Into<String>,
        pickup_date: &str,
        return_date: &str,
        pickup_time: &str,
        return_time: &str,
    ) -> EngineResult<Self> {
        Ok(BookingRequest {
            vehicle_id: vehicle_id.into(),
            renter_id: renter_id.into(),
            pickup_date: DateTimeResolver::parse_date(pickup_date)?,
            return_date: DateTimeResolver::parse_date(return_date)?,
            pickup_time: pickup_time.parse()?,
            return_time: return_time.parse()?,
        })
    }
}

/// A renter's vehicle and supplier scores for one completed booking.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSubmission {
    pub booking_id: String,
    pub author_id: String,
    pub vehicle_score: u8,
    pub vehicle_comment: Option<String>,
    pub supplier_score: u8,
    pub supplier_comment: Option<String>,
}

/// Entry in the `renter_bookings` index.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RenterBookingRef {
    renter_id: String,
    booking_id: String,
    created_at: DateTime<Utc>,
}

// =============================================================================
// Lifecycle
// =============================================================================

pub struct BookingLifecycle {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    resolver: DateTimeResolver,
}

impl BookingLifecycle {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        resolver: DateTimeResolver,
    ) -> Self {
        BookingLifecycle {
            store,
            identity,
            resolver,
        }
    }

    /// Books a vehicle for the signed-in renter. The new booking is Pending.
    ///
    /// The price is `price_per_day × inclusive calendar days`; the clock
    /// times only fix the pickup and return instants.
    pub async fn create_booking(&self, request: &BookingRequest) -> EngineResult<Booking> {
        validate_id("vehicle_id", &request.vehicle_id)?;
        validate_id("renter_id", &request.renter_id)?;
        require_user(self.identity.as_ref(), &request.renter_id, "create booking")?;

        let vehicle = self.load_vehicle(&request.vehicle_id).await?;

        let window = rules::resolve_window(
            &self.resolver,
            vehicle.price_per_day,
            request.pickup_date,
            request.return_date,
            request.pickup_time,
            request.return_time,
        )?;

        let now = Utc::now();
        let booking = Booking {
            id: generate_id(),
            vehicle_id: vehicle.id.clone(),
            renter_id: request.renter_id.clone(),
            pickup_at: window.pickup_at,
            return_at: window.return_at,
            price_per_day: window.quote.price_per_day,
            rental_days: window.quote.days,
            total_price: window.quote.total,
            status: BookingStatus::Pending,
            rated: false,
            created_at: now,
            updated_at: now,
        };

        let back_ref = RenterBookingRef {
            renter_id: booking.renter_id.clone(),
            booking_id: booking.id.clone(),
            created_at: now,
        };

        let batch = WriteBatch::new()
            .create(BOOKINGS, &booking.id, to_data(&booking)?)
            .create(RENTER_BOOKINGS, &booking.id, to_data(&back_ref)?);
        self.store.commit(batch).await?;

        info!(
            booking_id = %booking.id,
            vehicle_id = %booking.vehicle_id,
            renter_id = %booking.renter_id,
            days = booking.rental_days,
            total = %booking.total_price,
            "Booking created"
        );

        Ok(booking)
    }

    /// Pending → OnGoing.
    pub async fn confirm(&self, booking_id: &str) -> EngineResult<Booking> {
        self.apply(booking_id, BookingAction::Confirm).await
    }

    /// OnGoing → Complete. Does not create any rating.
    pub async fn mark_complete(&self, booking_id: &str) -> EngineResult<Booking> {
        self.apply(booking_id, BookingAction::Complete).await
    }

    /// Pending/OnGoing → Cancelled. Cancelling a cancelled booking is a no-op.
    pub async fn cancel(&self, booking_id: &str) -> EngineResult<Booking> {
        self.apply(booking_id, BookingAction::Cancel).await
    }

    pub async fn get_booking(&self, booking_id: &str) -> EngineResult<Booking> {
        validate_id("booking_id", booking_id)?;
        let (_, booking) = self.load_booking(booking_id).await?;
        Ok(booking)
    }

    /// Records the vehicle and supplier ratings and marks the booking rated.
    ///
    /// Returns `(vehicle_rating, supplier_rating)`.
    pub async fn submit_rating(&self, submission: &RatingSubmission) -> EngineResult<(Rating, Rating)> {
        validate_id("booking_id", &submission.booking_id)?;
        validate_id("author_id", &submission.author_id)?;
        validate_score("vehicle_score", submission.vehicle_score)?;
        validate_score("supplier_score", submission.supplier_score)?;
        let vehicle_comment =
            validate_comment("vehicle_comment", submission.vehicle_comment.as_deref())?;
        let supplier_comment =
            validate_comment("supplier_comment", submission.supplier_comment.as_deref())?;

        require_user(self.identity.as_ref(), &submission.author_id, "submit rating")?;

        let (doc, booking) = self.load_booking(&submission.booking_id).await?;
        if booking.renter_id != submission.author_id {
            return Err(ValidationError::Unauthenticated {
                action: "rate another renter's booking".to_string(),
            }
            .into());
        }
        rules::ensure_ratable(&booking)?;

        let vehicle = self.load_vehicle(&booking.vehicle_id).await?;
        let now = Utc::now();

        let vehicle_rating = Rating {
            id: generate_id(),
            target_type: RatingTarget::Vehicle,
            target_id: vehicle.id.clone(),
            booking_id: booking.id.clone(),
            score: submission.vehicle_score,
            comment: vehicle_comment,
            author_id: submission.author_id.clone(),
            created_at: now,
        };
        let supplier_rating = Rating {
            id: generate_id(),
            target_type: RatingTarget::Supplier,
            target_id: vehicle.owner_id.clone(),
            booking_id: booking.id.clone(),
            score: submission.supplier_score,
            comment: supplier_comment,
            author_id: submission.author_id.clone(),
            created_at: now,
        };

        // Guard on what was read; older records may lack `rated` entirely.
        let batch = WriteBatch::new()
            .expect_unchanged(BOOKINGS, &booking.id, "status", doc.field("status").cloned())
            .expect_unchanged(BOOKINGS, &booking.id, "rated", doc.field("rated").cloned())
            .create(RATINGS, &vehicle_rating.id, to_data(&vehicle_rating)?)
            .create(RATINGS, &supplier_rating.id, to_data(&supplier_rating)?)
            .update(BOOKINGS, &booking.id, json!({ "rated": true, "updated_at": now }));

        match self.store.commit(batch).await {
            Ok(()) => {}
            Err(StoreError::PreconditionFailed { field, .. }) if field == "rated" => {
                return Err(EngineError::AlreadyRated {
                    booking_id: booking.id,
                });
            }
            Err(StoreError::PreconditionFailed { .. }) => {
                let (_, current) = self.load_booking(&booking.id).await?;
                return Err(EngineError::InvalidTransition {
                    booking_id: booking.id,
                    from: current.status,
                    action: "rate",
                });
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            booking_id = %booking.id,
            vehicle_score = vehicle_rating.score,
            supplier_score = supplier_rating.score,
            "Ratings submitted"
        );

        Ok((vehicle_rating, supplier_rating))
    }

    /// The renter's bookings, newest first, resolved through the
    /// `renter_bookings` index.
    pub async fn list_bookings(
        &self,
        renter_id: &str,
        tab: Option<BookingTab>,
    ) -> EngineResult<Vec<Booking>> {
        validate_id("renter_id", renter_id)?;

        let refs = self
            .store
            .query_by_field(RENTER_BOOKINGS, "renter_id", &Value::from(renter_id))
            .await?;

        let mut bookings = Vec::with_capacity(refs.len());
        for doc in &refs {
            let booking_ref: RenterBookingRef = match doc.decode() {
                Ok(r) => r,
                Err(e) => {
                    warn!(entry = %doc.id, error = %e, "Skipping malformed booking reference");
                    continue;
                }
            };

            let Some(booking_doc) = self.store.get_by_id(BOOKINGS, &booking_ref.booking_id).await?
            else {
                debug!(booking_id = %booking_ref.booking_id, "Dangling booking reference");
                continue;
            };

            match booking_doc.decode::<Booking>() {
                Ok(b) if tab.map_or(true, |t| t.matches(b.status)) => bookings.push(b),
                Ok(_) => {}
                Err(e) => warn!(booking_id = %booking_doc.id, error = %e, "Skipping malformed booking"),
            }
        }

        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn apply(&self, booking_id: &str, action: BookingAction) -> EngineResult<Booking> {
        validate_id("booking_id", booking_id)?;

        let (doc, booking) = self.load_booking(booking_id).await?;

        if action == BookingAction::Cancel && booking.status == BookingStatus::Cancelled {
            debug!(booking_id = %booking_id, "Booking already cancelled");
            return Ok(booking);
        }

        let next = rules::transition(&booking.id, booking.status, action)?;
        let now = Utc::now();

        // Guard on the stored spelling so legacy values like "Confirmed" match.
        let batch = WriteBatch::new()
            .expect_unchanged(BOOKINGS, booking_id, "status", doc.field("status").cloned())
            .update(
                BOOKINGS,
                booking_id,
                json!({ "status": next.as_str(), "updated_at": now }),
            );

        match self.store.commit(batch).await {
            Ok(()) => {}
            Err(StoreError::PreconditionFailed { .. }) => {
                let (_, current) = self.load_booking(booking_id).await?;
                if action == BookingAction::Cancel && current.status == BookingStatus::Cancelled {
                    return Ok(current);
                }
                warn!(booking_id = %booking_id, action = %action, "Booking changed concurrently");
                return Err(EngineError::InvalidTransition {
                    booking_id: booking_id.to_string(),
                    from: current.status,
                    action: action.as_str(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            booking_id = %booking_id,
            from = %booking.status,
            to = %next,
            "Booking status changed"
        );

        Ok(Booking {
            status: next,
            updated_at: now,
            ..booking
        })
    }

    async fn load_booking(&self, booking_id: &str) -> EngineResult<(Document, Booking)> {
        let doc = self
            .store
            .get_by_id(BOOKINGS, booking_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Booking", booking_id))?;
        let booking = doc.decode()?;
        Ok((doc, booking))
    }

    async fn load_vehicle(&self, vehicle_id: &str) -> EngineResult<Vehicle> {
        let doc = self
            .store
            .get_by_id(VEHICLES, vehicle_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Vehicle", vehicle_id))?;
        Ok(doc.decode()?)
    }
}
