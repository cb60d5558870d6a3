//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * value[t] + (1 - alpha) * EMA[t-1] with
//! alpha = 2 / (span + 1), seeded by the first value (no bias adjustment).
//! Defined from index 0 — there is no warm-up prefix.

/// Compute the EMA over `values` with the given span.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    assert!(span >= 1, "EMA span must be >= 1");

    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    let mut prev = first;
    result.push(prev);

    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        result.push(prev);
    }

    result
}
