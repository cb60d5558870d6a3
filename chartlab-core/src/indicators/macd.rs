//! Moving Average Convergence Divergence (MACD).
//!
//! Line: EMA(close, 12) - EMA(close, 26).
//! Signal: EMA(line, 9).
//! Histogram: line - signal.

use super::ema::ema;

pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;

/// The three MACD output series, each the same length as the input.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD with the standard 12/26/9 spans.
pub fn macd(closes: &[f64]) -> MacdSeries {
    let fast = ema(closes, MACD_FAST_SPAN);
    let slow = ema(closes, MACD_SLOW_SPAN);

    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema(&line, MACD_SIGNAL_SPAN);
    let histogram: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn macd_lengths_match_input() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + (i as f64 * 0.1).sin()).collect();
        let m = macd(&closes);
        assert_eq!(m.line.len(), 100);
        assert_eq!(m.signal.len(), 100);
        assert_eq!(m.histogram.len(), 100);
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + (i as f64 * 0.07).cos() * 5.0).collect();
        let m = macd(&closes);
        for i in 0..closes.len() {
            assert_eq!(m.histogram[i], m.line[i] - m.signal[i], "index {i}");
        }
    }

    #[test]
    fn macd_of_constant_series_is_zero() {
        let closes = [50.0; 80];
        let m = macd(&closes);
        for i in 0..80 {
            assert_approx(m.line[i], 0.0, DEFAULT_EPSILON);
            assert_approx(m.signal[i], 0.0, DEFAULT_EPSILON);
            assert_approx(m.histogram[i], 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_first_point_is_zero() {
        // Both EMAs are seeded by the same first close, so the line starts at 0.
        let closes = [123.0, 125.0, 120.0, 130.0];
        let m = macd(&closes);
        assert_approx(m.line[0], 0.0, DEFAULT_EPSILON);
        assert_approx(m.histogram[0], 0.0, DEFAULT_EPSILON);
    }
}
