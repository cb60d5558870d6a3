//! Price bars and the validated daily price series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily OHLC bar for a single ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// Returns true if every OHLC field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}

/// Violations detected while constructing a [`PriceSeries`].
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("price series must contain at least one bar")]
    Empty,

    #[error("bar at index {index} ({date}) is not after the previous bar ({prev})")]
    OutOfOrder {
        index: usize,
        date: NaiveDate,
        prev: NaiveDate,
    },

    #[error("bar at index {index} ({date}) contains a non-finite price")]
    NonFinite { index: usize, date: NaiveDate },
}

/// Immutable daily price series: non-empty, strictly increasing by date,
/// no duplicate dates, all prices finite.
///
/// The constructor is the only way to build one, so every consumer
/// (indicators, renderer) can rely on the ordering invariant without
/// re-checking it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validate and wrap a bar vector.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(SeriesError::NonFinite {
                    index: i,
                    date: bar.date,
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(SeriesError::OutOfOrder {
                    index: i,
                    date: bar.date,
                    prev: bars[i - 1].date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// First (oldest) bar.
    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    /// Last (most recent) bar.
    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// As-of lookup: the latest bar with `date <= target`, or `None` when
    /// the series starts after `target`.
    pub fn as_of(&self, target: NaiveDate) -> Option<&PriceBar> {
        let idx = self.bars.partition_point(|b| b.date <= target);
        if idx == 0 {
            None
        } else {
            Some(&self.bars[idx - 1])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(y: i32, m: u32, d: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
        }
    }

    #[test]
    fn series_rejects_empty() {
        assert!(matches!(PriceSeries::new(vec![]), Err(SeriesError::Empty)));
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let bars = vec![bar(2024, 1, 2, 100.0), bar(2024, 1, 2, 101.0)];
        assert!(matches!(
            PriceSeries::new(bars),
            Err(SeriesError::OutOfOrder { index: 1, .. })
        ));
    }

    #[test]
    fn series_rejects_out_of_order_dates() {
        let bars = vec![bar(2024, 1, 3, 100.0), bar(2024, 1, 2, 101.0)];
        assert!(PriceSeries::new(bars).is_err());
    }

    #[test]
    fn series_rejects_non_finite_prices() {
        let mut b = bar(2024, 1, 2, 100.0);
        b.close = f64::NAN;
        assert!(matches!(
            PriceSeries::new(vec![b]),
            Err(SeriesError::NonFinite { index: 0, .. })
        ));
    }

    #[test]
    fn as_of_exact_and_between_dates() {
        let series = PriceSeries::new(vec![
            bar(2024, 1, 2, 100.0),
            bar(2024, 1, 3, 101.0),
            bar(2024, 1, 8, 102.0),
        ])
        .unwrap();

        // Exact hit
        let hit = series.as_of(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(hit.unwrap().close, 101.0);

        // Between observations: latest bar on or before the target
        let weekend = series.as_of(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
        assert_eq!(weekend.unwrap().close, 101.0);

        // After the last bar
        let late = series.as_of(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(late.unwrap().close, 102.0);
    }

    #[test]
    fn as_of_before_first_bar_is_none() {
        let series = PriceSeries::new(vec![bar(2024, 1, 2, 100.0)]).unwrap();
        assert!(series
            .as_of(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .is_none());
    }

    #[test]
    fn series_serialization_roundtrip() {
        let series =
            PriceSeries::new(vec![bar(2024, 1, 2, 100.0), bar(2024, 1, 3, 101.0)]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        let deser: PriceSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(series, deser);
    }
}
