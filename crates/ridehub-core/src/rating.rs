//! # Rating Aggregation
//!
//! Reduces individual 1-5 scores to an `{average, count}` summary for a
//! vehicle or a supplier, and maps a summary to the label and star row the
//! listing cards show.
//!
//! Summaries are always recomputed from the full rating set; nothing here
//! keeps a running total.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Rating;

/// Aggregated reputation for one target.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RatingSummary {
    /// Arithmetic mean of all scores, 0 when there are none.
    pub average: f64,
    pub count: u32,
}

/// Star row for a 5-star display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StarRow {
    pub filled: u8,
    pub half: u8,
    pub empty: u8,
}

impl RatingSummary {
    /// Summary of an empty rating set.
    pub const EMPTY: RatingSummary = RatingSummary {
        average: 0.0,
        count: 0,
    };

    /// Aggregates raw scores.
    ///
    /// ## Example
    /// ```rust
    /// use ridehub_core::RatingSummary;
    ///
    /// let s = RatingSummary::aggregate([5, 4, 3]);
    /// assert_eq!(s.count, 3);
    /// assert!((s.average - 4.0).abs() < 1e-9);
    ///
    /// assert_eq!(RatingSummary::aggregate([]), RatingSummary::EMPTY);
    /// ```
    pub fn aggregate<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = scores
            .into_iter()
            .fold((0u64, 0u32), |(sum, n), s| (sum + u64::from(s), n + 1));

        if count == 0 {
            return RatingSummary::EMPTY;
        }

        RatingSummary {
            average: sum as f64 / f64::from(count),
            count,
        }
    }

    /// Aggregates full rating records.
    pub fn from_ratings<'a, I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = &'a Rating>,
    {
        Self::aggregate(ratings.into_iter().map(|r| r.score))
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Word label for the average.
    pub fn label(&self) -> &'static str {
        match self.average {
            a if a >= 4.5 => "Excellent",
            a if a >= 4.0 => "Very Good",
            a if a >= 3.0 => "Good",
            a if a >= 2.0 => "Bad",
            a if a >= 1.0 => "Very Bad",
            _ => "No Rating",
        }
    }

    /// Filled/half/empty stars out of five.
    pub fn stars(&self) -> StarRow {
        let avg = self.average.clamp(0.0, 5.0);
        let filled = avg.floor() as u8;
        let half = u8::from(filled < 5 && avg - avg.floor() >= 0.5);
        StarRow {
            filled,
            half,
            empty: 5 - filled - half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        let s = RatingSummary::aggregate(Vec::new());
        assert_eq!(s.count, 0);
        assert_eq!(s.average, 0.0);
        assert!(s.is_empty());
        assert_eq!(s.label(), "No Rating");
    }

    #[test]
    fn test_count_and_mean() {
        let sets: Vec<Vec<u8>> = vec![
            vec![5],
            vec![1, 2, 3, 4, 5],
            vec![4, 4, 5],
            vec![1; 40],
            vec![2, 5, 5, 3, 1, 4, 4],
        ];
        for set in sets {
            let s = RatingSummary::aggregate(set.iter().copied());
            assert_eq!(s.count as usize, set.len());
            let mean = set.iter().map(|&x| f64::from(x)).sum::<f64>() / set.len() as f64;
            assert!((s.average - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn test_labels() {
        let label = |average| RatingSummary { average, count: 1 }.label();
        assert_eq!(label(5.0), "Excellent");
        assert_eq!(label(4.5), "Excellent");
        assert_eq!(label(4.2), "Very Good");
        assert_eq!(label(3.0), "Good");
        assert_eq!(label(2.0), "Bad");
        assert_eq!(label(1.4), "Very Bad");
    }

    #[test]
    fn test_stars() {
        let stars = |average| RatingSummary { average, count: 1 }.stars();
        assert_eq!(stars(4.5), StarRow { filled: 4, half: 1, empty: 0 });
        assert_eq!(stars(4.2), StarRow { filled: 4, half: 0, empty: 1 });
        assert_eq!(stars(0.0), StarRow { filled: 0, half: 0, empty: 5 });
        assert_eq!(stars(5.0), StarRow { filled: 5, half: 0, empty: 0 });
    }
}
