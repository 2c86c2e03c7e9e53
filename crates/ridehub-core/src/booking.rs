//! # Booking Rules
//!
//! The booking state machine, price quoting, and rating eligibility.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │    ┌─────────┐   confirm    ┌─────────┐   complete   ┌──────────┐      │
//! │    │ Pending │ ───────────► │ OnGoing │ ───────────► │ Complete │      │
//! │    └────┬────┘              └────┬────┘              └──────────┘      │
//! │         │ cancel                 │ cancel              (terminal)      │
//! │         ▼                        ▼                                     │
//! │    ┌─────────────────────────────────┐                                 │
//! │    │            Cancelled            │  (terminal)                     │
//! │    └─────────────────────────────────┘                                 │
//! │                                                                         │
//! │  rated: false ──submit_rating──► true   (only while Complete)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`transition`] is total over `(status, action)` and rejects every action
//! out of a terminal state. The engine layers idempotent cancel on top.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::datetime::{ClockTime, DateTimeResolver};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Booking, BookingStatus};

// =============================================================================
// Actions
// =============================================================================

/// A lifecycle action requested on a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingAction {
    Confirm,
    Complete,
    Cancel,
}

impl BookingAction {
    pub const ALL: [BookingAction; 3] = [
        BookingAction::Confirm,
        BookingAction::Complete,
        BookingAction::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingAction::Confirm => "confirm",
            BookingAction::Complete => "complete",
            BookingAction::Cancel => "cancel",
        }
    }
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the status reached by applying `action` to a booking in `from`.
///
/// ## Example
/// ```rust
/// use ridehub_core::booking::{transition, BookingAction};
/// use ridehub_core::BookingStatus;
///
/// let next = transition("bk-1", BookingStatus::Pending, BookingAction::Confirm).unwrap();
/// assert_eq!(next, BookingStatus::OnGoing);
///
/// assert!(transition("bk-1", BookingStatus::Complete, BookingAction::Cancel).is_err());
/// ```
pub fn transition(
    booking_id: &str,
    from: BookingStatus,
    action: BookingAction,
) -> CoreResult<BookingStatus> {
    use BookingAction as A;
    use BookingStatus as S;

    match (from, action) {
        (S::Pending, A::Confirm) => Ok(S::OnGoing),
        (S::OnGoing, A::Complete) => Ok(S::Complete),
        (S::Pending | S::OnGoing, A::Cancel) => Ok(S::Cancelled),
        _ => Err(CoreError::InvalidTransition {
            booking_id: booking_id.to_string(),
            from,
            action: action.as_str(),
        }),
    }
}

/// Checks that a booking may receive its rating pair.
pub fn ensure_ratable(booking: &Booking) -> CoreResult<()> {
    if booking.status != BookingStatus::Complete {
        return Err(CoreError::InvalidTransition {
            booking_id: booking.id.clone(),
            from: booking.status,
            action: "rate",
        });
    }
    if booking.rated {
        return Err(CoreError::AlreadyRated {
            booking_id: booking.id.clone(),
        });
    }
    Ok(())
}

// =============================================================================
// Pricing
// =============================================================================

/// Price of a rental, computed from the calendar dates alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceQuote {
    pub price_per_day: Money,
    /// Inclusive calendar-day count (same-day rental is 1).
    pub days: u32,
    pub total: Money,
}

/// Quotes `price_per_day × inclusive days` for a date range.
pub fn quote(price_per_day: Money, pickup: NaiveDate, ret: NaiveDate) -> CoreResult<PriceQuote> {
    let days = DateTimeResolver::day_count(pickup, ret)?;
    let total = price_per_day
        .multiply_days(days)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "total_price".to_string(),
            min: 0,
            max: i64::MAX,
        })?;
    Ok(PriceQuote {
        price_per_day,
        days,
        total,
    })
}

/// Resolved pickup and return instants plus the price quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingWindow {
    pub pickup_at: DateTime<Utc>,
    pub return_at: DateTime<Utc>,
    pub quote: PriceQuote,
}

/// Resolves a date/clock pair on each end into a priced booking window.
///
/// Fails if the return date precedes the pickup date, or if the return
/// instant is not strictly after the pickup instant (same day, earlier
/// clock time).
pub fn resolve_window(
    resolver: &DateTimeResolver,
    price_per_day: Money,
    pickup_date: NaiveDate,
    return_date: NaiveDate,
    pickup_clock: ClockTime,
    return_clock: ClockTime,
) -> CoreResult<BookingWindow> {
    let quote = quote(price_per_day, pickup_date, return_date)?;
    let pickup_at = resolver.to_instant(pickup_date, pickup_clock)?;
    let return_at = resolver.to_instant(return_date, return_clock)?;

    if return_at <= pickup_at {
        return Err(ValidationError::NonPositiveDuration.into());
    }

    Ok(BookingWindow {
        pickup_at,
        return_at,
        quote,
    })
}

// =============================================================================
// My Bookings Tabs
// =============================================================================

/// Tabs on the renter's bookings screen. Each shows one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BookingTab {
    Pending,
    OnGoing,
    Complete,
    Cancelled,
}

impl BookingTab {
    pub fn matches(&self, status: BookingStatus) -> bool {
        self.status() == status
    }

    pub fn status(&self) -> BookingStatus {
        match self {
            BookingTab::Pending => BookingStatus::Pending,
            BookingTab::OnGoing => BookingStatus::OnGoing,
            BookingTab::Complete => BookingStatus::Complete,
            BookingTab::Cancelled => BookingStatus::Cancelled,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
