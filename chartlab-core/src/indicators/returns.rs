//! Return statistics: trailing annual log-return series and N-year
//! as-of point returns.

use super::IndicatorError;
use crate::domain::PriceSeries;
use chrono::Duration;

/// Observations in a trading year.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Trailing annual return series.
///
/// Daily simple return -> ln(1 + r) -> rolling 252-day sum -> exp(sum) - 1.
/// A value is emitted only once 252 prior observations exist, so for an
/// input of length L the first 252 slots are NaN and `L - 252` values are
/// defined (none when `L <= 252`).
pub fn trailing_annual_return(closes: &[f64]) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];

    if n <= TRADING_DAYS_PER_YEAR {
        return result;
    }

    // log_returns[i] corresponds to the simple return at index i+1.
    let log_returns: Vec<f64> = closes
        .windows(2)
        .map(|w| (w[1] / w[0]).ln())
        .collect();

    let mut sum: f64 = log_returns[..TRADING_DAYS_PER_YEAR].iter().sum();
    result[TRADING_DAYS_PER_YEAR] = sum.exp() - 1.0;

    for i in (TRADING_DAYS_PER_YEAR + 1)..n {
        sum += log_returns[i - 1] - log_returns[i - 1 - TRADING_DAYS_PER_YEAR];
        result[i] = sum.exp() - 1.0;
    }

    result
}

/// Percentage return over the last `years` calendar years.
///
/// The reference close is the as-of observation for
/// `last_date - years * 365 days`: the latest bar on or before that date.
/// Fails when the series does not reach back that far.
pub fn point_return(series: &PriceSeries, years: i64) -> Result<f64, IndicatorError> {
    let last = series.last();
    let target = last.date - Duration::days(365 * years);

    let reference = series.as_of(target).ok_or_else(|| {
        IndicatorError::InsufficientHistory(format!(
            "no observation on or before {target} ({years}-year return, series starts {})",
            series.first().date
        ))
    })?;

    Ok((last.close - reference.close) / reference.close * 100.0)
}
