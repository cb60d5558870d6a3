//! Indicator engine — pure, stateless transforms over a price series.
//!
//! Series-valued indicators return a `Vec<f64>` of the same length as the
//! input, with `f64::NAN` filling the undefined warm-up prefix. "Defined
//! value" always means non-NaN. Inputs are finite by construction
//! (`PriceSeries` rejects non-finite prices), so the computations never
//! have to guard mid-series.

pub mod ema;
pub mod macd;
pub mod returns;
pub mod sma;

pub use ema::ema;
pub use macd::{macd, MacdSeries, MACD_FAST_SPAN, MACD_SIGNAL_SPAN, MACD_SLOW_SPAN};
pub use returns::{point_return, trailing_annual_return, TRADING_DAYS_PER_YEAR};
pub use sma::sma;

use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// SMA windows plotted on the moving-average panel.
pub const SMA_FAST_WINDOW: usize = 55;
pub const SMA_SLOW_WINDOW: usize = 200;

#[derive(Debug, Clone, Error)]
pub enum IndicatorError {
    #[error("insufficient history: {0}")]
    InsufficientHistory(String),
}

/// The closed set of chartable indicators.
///
/// Adding a variant forces every dispatch site to handle it; there is no
/// string-keyed branching anywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma,
    Macd,
    TrailingReturn,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 3] = [
        IndicatorKind::Sma,
        IndicatorKind::Macd,
        IndicatorKind::TrailingReturn,
    ];

    /// Chart-title label.
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::TrailingReturn => "Trailing Annual Return",
        }
    }

    /// CLI / file-name token.
    pub fn token(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Macd => "macd",
            IndicatorKind::TrailingReturn => "trailing-return",
        }
    }
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sma" => Ok(IndicatorKind::Sma),
            "macd" => Ok(IndicatorKind::Macd),
            "trailing-return" | "trailing_return" => Ok(IndicatorKind::TrailingReturn),
            other => Err(format!(
                "unknown indicator '{other}' (expected sma, macd, or trailing-return)"
            )),
        }
    }
}

/// One labeled line on a chart, aligned index-for-index with the series dates.
#[derive(Debug, Clone)]
pub struct PlotLine {
    pub label: String,
    pub values: Vec<f64>,
}

impl PlotLine {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Everything an indicator contributes to its chart: labeled lines, an
/// optional histogram, and the y-axis label.
#[derive(Debug, Clone)]
pub struct IndicatorPanel {
    pub y_label: &'static str,
    pub lines: Vec<PlotLine>,
    pub histogram: Option<Vec<f64>>,
}

/// Compute the panel for one indicator kind over a price series.
pub fn build_panel(
    kind: IndicatorKind,
    series: &PriceSeries,
) -> Result<IndicatorPanel, IndicatorError> {
    let closes = series.closes();

    match kind {
        IndicatorKind::Sma => Ok(IndicatorPanel {
            y_label: "Price",
            lines: vec![
                PlotLine::new("Close", closes.clone()),
                PlotLine::new(
                    format!("{SMA_FAST_WINDOW}-day SMA"),
                    sma(&closes, SMA_FAST_WINDOW),
                ),
                PlotLine::new(
                    format!("{SMA_SLOW_WINDOW}-day SMA"),
                    sma(&closes, SMA_SLOW_WINDOW),
                ),
            ],
            histogram: None,
        }),

        IndicatorKind::Macd => {
            let m = macd(&closes);
            Ok(IndicatorPanel {
                y_label: "MACD",
                lines: vec![
                    PlotLine::new("MACD", m.line),
                    PlotLine::new("Signal Line", m.signal),
                ],
                histogram: Some(m.histogram),
            })
        }

        IndicatorKind::TrailingReturn => {
            let values = trailing_annual_return(&closes);
            if values.iter().all(|v| v.is_nan()) {
                return Err(IndicatorError::InsufficientHistory(format!(
                    "trailing annual return needs more than {TRADING_DAYS_PER_YEAR} \
                     observations, got {}",
                    closes.len()
                )));
            }
            Ok(IndicatorPanel {
                y_label: "Trailing 1Y Return",
                lines: vec![PlotLine::new("Trailing 1Y Return", values)],
                histogram: None,
            })
        }
    }
}

/// Build a synthetic series from close prices for tests.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> PriceSeries {
    use crate::domain::PriceBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect();
    PriceSeries::new(bars).expect("test closes must form a valid series")
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_from_cli_tokens() {
        assert_eq!("sma".parse::<IndicatorKind>().unwrap(), IndicatorKind::Sma);
        assert_eq!(
            "MACD".parse::<IndicatorKind>().unwrap(),
            IndicatorKind::Macd
        );
        assert_eq!(
            "trailing-return".parse::<IndicatorKind>().unwrap(),
            IndicatorKind::TrailingReturn
        );
        assert!("rsi".parse::<IndicatorKind>().is_err());
    }

    #[test]
    fn sma_panel_has_close_and_two_averages() {
        let series = make_series(&vec![100.0; 260]);
        let panel = build_panel(IndicatorKind::Sma, &series).unwrap();
        assert_eq!(panel.y_label, "Price");
        assert_eq!(panel.lines.len(), 3);
        assert!(panel.histogram.is_none());
        assert_eq!(panel.lines[0].label, "Close");
        assert_eq!(panel.lines[1].label, "55-day SMA");
        assert_eq!(panel.lines[2].label, "200-day SMA");
    }

    #[test]
    fn macd_panel_has_histogram() {
        let series = make_series(&vec![100.0; 60]);
        let panel = build_panel(IndicatorKind::Macd, &series).unwrap();
        assert_eq!(panel.lines.len(), 2);
        assert!(panel.histogram.is_some());
    }

    #[test]
    fn trailing_return_panel_needs_history() {
        let short = make_series(&vec![100.0; 100]);
        assert!(matches!(
            build_panel(IndicatorKind::TrailingReturn, &short),
            Err(IndicatorError::InsufficientHistory(_))
        ));

        let long = make_series(&vec![100.0; 300]);
        let panel = build_panel(IndicatorKind::TrailingReturn, &long).unwrap();
        assert_eq!(panel.lines.len(), 1);
    }
}
