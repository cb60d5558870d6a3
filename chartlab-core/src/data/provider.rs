//! Quote provider trait and structured fetch errors.
//!
//! The QuoteProvider trait abstracts over market-data sources (Yahoo
//! Finance, synthetic data) so the cache and dispatcher never care where a
//! series came from, and tests can count provider calls with a mock.

use crate::domain::PriceSeries;
use chrono::NaiveDate;
use thiserror::Error;

/// A single fetch: daily bars for one ticker over a date range, optionally
/// with a market-capitalization lookup (equities only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub include_market_cap: bool,
}

impl FetchRequest {
    pub fn new(ticker: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            start,
            end,
            include_market_cap: false,
        }
    }

    pub fn with_market_cap(mut self) -> Self {
        self.include_market_cap = true;
        self
    }
}

/// A successful fetch: the price series plus scalar metadata.
///
/// `market_cap` is in billions of the quote currency. `None` means the
/// provider could not supply it — never zero, never a sentinel string.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub series: PriceSeries,
    pub market_cap: Option<f64>,
}

/// Fetch failures. Providers return these as values; nothing escapes the
/// provider boundary as a panic, so the dispatcher can keep processing
/// sibling requests.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("no data returned for {ticker} between {start} and {end}")]
    EmptyResult {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("provider failure for {ticker}: {message}")]
    Provider { ticker: String, message: String },
}

impl FetchError {
    pub fn provider(ticker: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            ticker: ticker.to_string(),
            message: message.into(),
        }
    }
}

/// Trait for market-data providers.
///
/// One provider call per `fetch` invocation — retry policy, if any, belongs
/// to the caller. The cache layer sits above this trait; providers don't
/// know about the cache.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars (and optionally market cap) for one ticker.
    fn fetch(&self, req: &FetchRequest) -> Result<Quote, FetchError>;
}
