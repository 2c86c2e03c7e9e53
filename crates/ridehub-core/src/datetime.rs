//! # Date/Time Resolution
//!
//! The single home of 12-hour clock handling. Pricing, booking timestamps
//! and display formatting all go through here.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Date picker: "2024-01-01"        Time picker: "10:00 AM"              │
//! │        │                                  │                            │
//! │        ▼                                  ▼                            │
//! │  parse_date() ─► NaiveDate        ClockTime::from_str()                │
//! │        │                                  │                            │
//! │        └──────────────┬───────────────────┘                            │
//! │                       ▼                                                │
//! │        DateTimeResolver::to_instant()   (local offset → UTC)           │
//! │                       │                                                │
//! │                       ▼                                                │
//! │            DateTime<Utc> stored on the booking                         │
//! │                                                                        │
//! │  day_count(pickup_date, return_date)  → inclusive days, drives price   │
//! │  elapsed_days(pickup_at, return_at)   → ceil(hours / 24), display only │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clock parsing is locale-invariant: `12 AM` is hour 0, `12 PM` stays 12,
//! any other PM hour adds 12.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const SECONDS_PER_DAY: i64 = 86_400;

// =============================================================================
// Clock Time
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Meridian {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl fmt::Display for Meridian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridian::Am => f.write_str("AM"),
            Meridian::Pm => f.write_str("PM"),
        }
    }
}

/// A 12-hour wall-clock time such as `10:00 AM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
    meridian: Meridian,
}

impl ClockTime {
    /// Builds a clock time, checking `hour` in 1..=12 and `minute` in 0..=59.
    pub fn new(hour: u8, minute: u8, meridian: Meridian) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&hour) {
            return Err(ValidationError::OutOfRange {
                field: "hour".to_string(),
                min: 1,
                max: 12,
            });
        }
        if minute > 59 {
            return Err(ValidationError::OutOfRange {
                field: "minute".to_string(),
                min: 0,
                max: 59,
            });
        }
        Ok(ClockTime {
            hour,
            minute,
            meridian,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn meridian(&self) -> Meridian {
        self.meridian
    }

    /// Hour on the 24-hour clock.
    pub fn hour24(&self) -> u32 {
        let h = u32::from(self.hour) % 12;
        match self.meridian {
            Meridian::Am => h,
            Meridian::Pm => h + 12,
        }
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // hour24 < 24 and minute < 60 by construction
        NaiveTime::from_hms_opt(self.hour24(), u32::from(self.minute), 0).unwrap_or(NaiveTime::MIN)
    }

    /// Inverse of [`ClockTime::to_naive_time`], dropping seconds.
    pub fn from_naive_time(t: NaiveTime) -> Self {
        let (is_pm, h12) = t.hour12();
        ClockTime {
            hour: h12 as u8,
            minute: t.minute() as u8,
            meridian: if is_pm { Meridian::Pm } else { Meridian::Am },
        }
    }
}

/// Renders as `9:00 PM`.
impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.hour, self.minute, self.meridian)
    }
}

/// Parses `"10:00 AM"`, `"09:00 PM"`, `"9:00pm"` or `"9 PM"`.
impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || {
            ValidationError::invalid_format("clock_time", format!("'{}' is not a 12-hour time", raw))
        };

        if raw.len() < 3 || !raw.is_char_boundary(raw.len() - 2) {
            return Err(invalid());
        }
        let (time, suffix) = raw.split_at(raw.len() - 2);
        let meridian = match suffix.to_ascii_uppercase().as_str() {
            "AM" => Meridian::Am,
            "PM" => Meridian::Pm,
            _ => return Err(invalid()),
        };

        let time = time.trim_end();
        let (h, m) = time.split_once(':').unwrap_or((time, "00"));
        if h.is_empty() || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;

        ClockTime::new(hour, minute, meridian)
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Turns local calendar dates and clock times into UTC instants.
///
/// The wall-clock offset is fixed per resolver (the rental region's offset,
/// configured on the engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeResolver {
    offset: FixedOffset,
}

impl Default for DateTimeResolver {
    fn default() -> Self {
        DateTimeResolver::utc()
    }
}

impl DateTimeResolver {
    pub fn new(offset: FixedOffset) -> Self {
        DateTimeResolver { offset }
    }

    /// Resolver with a zero offset.
    pub fn utc() -> Self {
        DateTimeResolver {
            offset: Utc.fix(),
        }
    }

    /// Resolver for an offset east of UTC in minutes (e.g. `480` for +08:00).
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, ValidationError> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or(ValidationError::OutOfRange {
                field: "utc_offset_minutes".to_string(),
                min: -1439,
                max: 1439,
            })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parses a `YYYY-MM-DD` date.
    pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| {
            ValidationError::invalid_format("date", format!("'{}': {}", s.trim(), e))
        })
    }

    /// Combines a local date and clock time into an absolute instant.
    pub fn to_instant(&self, date: NaiveDate, clock: ClockTime) -> Result<DateTime<Utc>, ValidationError> {
        let local = date.and_time(clock.to_naive_time());
        self.offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| ValidationError::invalid_format("date", format!("{} is not representable", local)))
    }

    /// Inclusive calendar-day count: same-day pickup and return is 1 day.
    ///
    /// ## Example
    /// ```rust
    /// use ridehub_core::datetime::DateTimeResolver;
    ///
    /// let a = DateTimeResolver::parse_date("2024-01-01").unwrap();
    /// let b = DateTimeResolver::parse_date("2024-01-03").unwrap();
    /// assert_eq!(DateTimeResolver::day_count(a, b).unwrap(), 3);
    /// assert_eq!(DateTimeResolver::day_count(a, a).unwrap(), 1);
    /// assert!(DateTimeResolver::day_count(b, a).is_err());
    /// ```
    pub fn day_count(start: NaiveDate, end: NaiveDate) -> Result<u32, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidDateRange {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }
        let days = (end - start).num_days() + 1;
        u32::try_from(days).map_err(|_| ValidationError::OutOfRange {
            field: "rental_days".to_string(),
            min: 1,
            max: i64::from(u32::MAX),
        })
    }

    /// Elapsed time rounded up to whole days. Zero when `end <= start`.
    pub fn elapsed_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
        let secs = (end - start).num_seconds();
        if secs <= 0 {
            return 0;
        }
        let days = (secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    /// Local clock time of an instant.
    pub fn local_clock(&self, instant: DateTime<Utc>) -> ClockTime {
        ClockTime::from_naive_time(instant.with_timezone(&self.offset).time())
    }

    /// Local date of an instant.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// `9:00 PM`
    pub fn format_clock(&self, instant: DateTime<Utc>) -> String {
        self.local_clock(instant).to_string()
    }

    /// `Mon, January 1, 2024 10:00 AM`
    pub fn format_instant(&self, instant: DateTime<Utc>) -> String {
        let local = instant.with_timezone(&self.offset);
        format!("{} {}", local.format("%a, %B %-d, %Y"), self.local_clock(instant))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        DateTimeResolver::parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_clock_times() {
        let t: ClockTime = "10:00 AM".parse().unwrap();
        assert_eq!(t.hour24(), 10);

        let t: ClockTime = "09:00 PM".parse().unwrap();
        assert_eq!(t.hour24(), 21);

        let t: ClockTime = "9:30pm".parse().unwrap();
        assert_eq!((t.hour24(), t.minute()), (21, 30));

        let t: ClockTime = "7 am".parse().unwrap();
        assert_eq!(t.hour24(), 7);
    }

    #[test]
    fn test_twelve_oclock_edges() {
        let midnight: ClockTime = "12:00 AM".parse().unwrap();
        assert_eq!(midnight.hour24(), 0);

        let noon: ClockTime = "12:00 PM".parse().unwrap();
        assert_eq!(noon.hour24(), 12);

        let one_pm: ClockTime = "1:00 PM".parse().unwrap();
        assert_eq!(one_pm.hour24(), 13);
    }

    #[test]
    fn test_rejects_bad_clock_times() {
        for s in ["", "10:00", "13:00 PM", "0:00 AM", "10:60 AM", "10:0 AM", "ten AM", "10:00 XM"] {
            assert!(s.parse::<ClockTime>().is_err(), "accepted {:?}", s);
        }
    }

    #[test]
    fn test_clock_display_round_trips_naive_time() {
        for s in ["12:00 AM", "9:05 AM", "12:30 PM", "11:59 PM"] {
            let t: ClockTime = s.parse().unwrap();
            assert_eq!(t.to_string(), s);
            assert_eq!(ClockTime::from_naive_time(t.to_naive_time()), t);
        }
    }

    #[test]
    fn test_to_instant_applies_offset() {
        let resolver = DateTimeResolver::from_offset_minutes(480).unwrap();
        let instant = resolver
            .to_instant(date("2024-01-01"), "10:00 AM".parse().unwrap())
            .unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-01-01T02:00:00+00:00");
        assert_eq!(resolver.format_clock(instant), "10:00 AM");
        assert_eq!(resolver.local_date(instant), date("2024-01-01"));
    }

    #[test]
    fn test_day_count_inclusive() {
        assert_eq!(DateTimeResolver::day_count(date("2024-01-01"), date("2024-01-01")).unwrap(), 1);
        assert_eq!(DateTimeResolver::day_count(date("2024-01-01"), date("2024-01-03")).unwrap(), 3);
        // Leap day.
        assert_eq!(DateTimeResolver::day_count(date("2024-02-28"), date("2024-03-01")).unwrap(), 3);
    }

    #[test]
    fn test_day_count_rejects_reversed_range() {
        let err = DateTimeResolver::day_count(date("2024-01-03"), date("2024-01-01")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_elapsed_days_rounds_up() {
        let r = DateTimeResolver::utc();
        let pickup = r.to_instant(date("2024-01-01"), "10:00 AM".parse().unwrap()).unwrap();
        let ret = r.to_instant(date("2024-01-03"), "9:00 PM".parse().unwrap()).unwrap();
        assert_eq!(DateTimeResolver::elapsed_days(pickup, ret), 3);

        let exact = r.to_instant(date("2024-01-02"), "10:00 AM".parse().unwrap()).unwrap();
        assert_eq!(DateTimeResolver::elapsed_days(pickup, exact), 1);
        assert_eq!(DateTimeResolver::elapsed_days(ret, pickup), 0);
    }

    #[test]
    fn test_format_instant() {
        let r = DateTimeResolver::utc();
        let instant = r.to_instant(date("2024-01-01"), "10:00 AM".parse().unwrap()).unwrap();
        assert_eq!(r.format_instant(instant), "Mon, January 1, 2024 10:00 AM");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(DateTimeResolver::parse_date("01/02/2024").is_err());
        assert!(DateTimeResolver::parse_date("2024-02-30").is_err());
    }
}
