//! Property tests for indicator invariants.
//!
//! Uses proptest to verify:
//! 1. SMA defined-value count and window-mean equality
//! 2. MACD histogram identity (histogram = line - signal, exactly)
//! 3. Trailing annual return equals the direct log-sum formula
//! 4. As-of lookup picks the latest bar on or before the target
//! 5. EMA is seeded by the first value
//! 6. Indicator purity: same input, bit-identical output

use chrono::{Duration, NaiveDate};
use chartlab_core::domain::{PriceBar, PriceSeries};
use chartlab_core::indicators::{ema, macd, sma, trailing_annual_return};
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, 1..max_len)
}

fn arb_window() -> impl Strategy<Value = usize> {
    1..60_usize
}

fn series_from(closes: &[f64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: base + Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 0.5,
            close,
        })
        .collect();
    PriceSeries::new(bars).expect("strategy produces valid series")
}

// ── 1. SMA ───────────────────────────────────────────────────────────

proptest! {
    /// SMA over a length-L input has exactly L - w + 1 defined values
    /// (zero when L < w), each the mean of the trailing window.
    #[test]
    fn sma_defined_count_and_window_mean(
        closes in arb_closes(200),
        window in arb_window(),
    ) {
        let result = sma(&closes, window);
        prop_assert_eq!(result.len(), closes.len());

        let defined = result.iter().filter(|v| !v.is_nan()).count();
        let expected = closes.len().saturating_sub(window - 1);
        prop_assert_eq!(defined, expected);

        for (i, value) in result.iter().enumerate() {
            if i + 1 < window {
                prop_assert!(value.is_nan());
            } else {
                let mean: f64 =
                    closes[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
                prop_assert!((value - mean).abs() < 1e-9);
            }
        }
    }
}

// ── 2. MACD ──────────────────────────────────────────────────────────

proptest! {
    /// histogram[i] == line[i] - signal[i], exactly, for all i.
    #[test]
    fn macd_histogram_identity(closes in arb_closes(300)) {
        let m = macd(&closes);
        prop_assert_eq!(m.line.len(), closes.len());
        for i in 0..closes.len() {
            prop_assert_eq!(m.histogram[i], m.line[i] - m.signal[i]);
        }
    }
}

// ── 3. Trailing annual return ────────────────────────────────────────

proptest! {
    /// The rolling computation matches the direct formula
    /// exp(sum of ln(1 + r_j) over the trailing 252 returns) - 1.
    #[test]
    fn trailing_return_matches_log_sum(closes in arb_closes(320)) {
        let result = trailing_annual_return(&closes);
        prop_assert_eq!(result.len(), closes.len());

        for (i, value) in result.iter().enumerate() {
            if i < 252 {
                prop_assert!(value.is_nan());
            } else {
                let sum: f64 = (i - 251..=i)
                    .map(|j| (closes[j] / closes[j - 1]).ln())
                    .sum();
                let expected = sum.exp() - 1.0;
                // Relative tolerance: exp amplifies the tiny float drift
                // between the rolling sum and the direct sum.
                let tolerance = 1e-9 * expected.abs().max(1.0);
                prop_assert!(
                    (value - expected).abs() < tolerance,
                    "index {}: got {}, expected {}", i, value, expected
                );
            }
        }
    }
}

// ── 4. As-of lookup ──────────────────────────────────────────────────

proptest! {
    /// as_of(target) is the latest bar with date <= target, or None when
    /// the series starts after the target.
    #[test]
    fn as_of_picks_latest_on_or_before(
        closes in arb_closes(60),
        offset in -30..120_i64,
    ) {
        let series = series_from(&closes);
        let target = series.first().date + Duration::days(offset);

        match series.as_of(target) {
            None => prop_assert!(series.first().date > target),
            Some(bar) => {
                prop_assert!(bar.date <= target);
                // No later bar is still on or before the target.
                for other in series.bars() {
                    if other.date <= target {
                        prop_assert!(other.date <= bar.date);
                    }
                }
            }
        }
    }
}

// ── 5 & 6. EMA seeding, purity ───────────────────────────────────────

proptest! {
    /// EMA is seeded by the first input value, with no bias adjustment.
    #[test]
    fn ema_seeded_by_first_value(closes in arb_closes(100), span in 1..40_usize) {
        let result = ema(&closes, span);
        prop_assert_eq!(result.len(), closes.len());
        prop_assert_eq!(result[0], closes[0]);
    }

    /// Indicators are pure: the same input produces bit-identical output.
    #[test]
    fn indicators_are_pure(closes in arb_closes(300), window in arb_window()) {
        let sma_a = sma(&closes, window);
        let sma_b = sma(&closes, window);
        for i in 0..closes.len() {
            prop_assert!(
                (sma_a[i].is_nan() && sma_b[i].is_nan()) || sma_a[i] == sma_b[i]
            );
        }

        let macd_a = macd(&closes);
        let macd_b = macd(&closes);
        prop_assert_eq!(macd_a.line, macd_b.line);
        prop_assert_eq!(macd_a.signal, macd_b.signal);
        prop_assert_eq!(macd_a.histogram, macd_b.histogram);
    }
}
