//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a trailing window.
//! The first `window - 1` slots are NaN (undefined, not zero).

/// Compute the SMA over `values` with the given window.
///
/// Returns a vector the same length as `values`; for an input of length L
/// exactly `L - window + 1` values are defined (none when `L < window`).
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "SMA window must be >= 1");

    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < window {
        return result;
    }

    let mut sum: f64 = values[..window].iter().sum();
    result[window - 1] = sum / window as f64;

    for i in window..n {
        sum += values[i] - values[i - window];
        result[i] = sum / window as f64;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        let result = sma(&values, 5);

        assert_eq!(result.len(), 7);
        for i in 0..4 {
            assert!(result[i].is_nan(), "expected NaN at index {i}");
        }
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_identity() {
        let values = [100.0, 200.0, 300.0];
        let result = sma(&values, 1);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_defined_count_is_len_minus_window_plus_one() {
        let values: Vec<f64> = (0..300).map(|i| 100.0 + i as f64).collect();
        for window in [1, 55, 200, 300] {
            let defined = sma(&values, window)
                .iter()
                .filter(|v| !v.is_nan())
                .count();
            assert_eq!(defined, values.len() - window + 1, "window={window}");
        }
    }

    #[test]
    fn sma_too_few_values_all_nan() {
        let result = sma(&[10.0, 11.0], 5);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
