//! Yahoo Finance quote provider.
//!
//! Daily bars come from the v8 chart API; market capitalization from the
//! v10 quoteSummary API. Yahoo has no official API and is subject to
//! unannounced format changes, so parse failures are reported as
//! `FetchError::Provider` rather than panics.

use super::provider::{FetchError, FetchRequest, Quote, QuoteProvider};
use crate::domain::{PriceBar, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
}

/// Yahoo Finance v10 quoteSummary response (price module only).
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryData>>,
}

#[derive(Debug, Deserialize)]
struct SummaryData {
    price: Option<PriceModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

/// Yahoo Finance data provider.
///
/// Exactly one chart-API call per `fetch`; no retry, no backoff. The HTTP
/// client carries a 30-second timeout so a hung provider cannot stall a
/// worker forever.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Build the chart API URL for a ticker and date range.
    fn chart_url(ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{ticker}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    /// Build the quoteSummary URL used for the market-cap lookup.
    fn summary_url(ticker: &str) -> String {
        format!(
            "https://query2.finance.yahoo.com/v10/finance/quoteSummary/{ticker}\
             ?modules=price"
        )
    }

    /// Parse the chart API response into a validated price series.
    fn parse_chart(req: &FetchRequest, resp: ChartResponse) -> Result<PriceSeries, FetchError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    FetchError::EmptyResult {
                        ticker: req.ticker.clone(),
                        start: req.start,
                        end: req.end,
                    }
                } else {
                    FetchError::provider(&req.ticker, format!("{}: {}", err.code, err.description))
                }
            } else {
                FetchError::provider(&req.ticker, "empty result with no error")
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::provider(&req.ticker, "result array is empty"))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| FetchError::provider(&req.ticker, "no timestamps"))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::provider(&req.ticker, "no quote data"))?;

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    FetchError::provider(&req.ticker, format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();

            // Rows with any missing price are holidays or partial sessions; skip them.
            let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close) else {
                continue;
            };

            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
            });
        }

        if bars.is_empty() {
            return Err(FetchError::EmptyResult {
                ticker: req.ticker.clone(),
                start: req.start,
                end: req.end,
            });
        }

        PriceSeries::new(bars)
            .map_err(|e| FetchError::provider(&req.ticker, format!("invalid series: {e}")))
    }

    /// Extract market cap in billions from the quoteSummary response.
    fn parse_market_cap(resp: SummaryResponse) -> Option<f64> {
        let raw = resp
            .quote_summary
            .result?
            .into_iter()
            .next()?
            .price?
            .market_cap?
            .raw?;
        Some(raw / 1e9)
    }

    /// Market-cap lookup. Degrades to `None` on any failure: a missing
    /// annotation must not lose an otherwise usable price series.
    fn fetch_market_cap(&self, ticker: &str) -> Option<f64> {
        let url = Self::summary_url(ticker);
        let resp = match self.client.get(&url).send() {
            Ok(resp) => resp,
            Err(e) => {
                warn!(ticker, error = %e, "market cap request failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            warn!(ticker, status = %resp.status(), "market cap request rejected");
            return None;
        }
        match resp.json::<SummaryResponse>() {
            Ok(summary) => Self::parse_market_cap(summary),
            Err(e) => {
                warn!(ticker, error = %e, "market cap response unparseable");
                None
            }
        }
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, req: &FetchRequest) -> Result<Quote, FetchError> {
        let url = Self::chart_url(&req.ticker, req.start, req.end);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::provider(&req.ticker, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::provider(&req.ticker, format!("HTTP {status}")));
        }

        let chart: ChartResponse = resp
            .json()
            .map_err(|e| FetchError::provider(&req.ticker, format!("parse response: {e}")))?;

        let series = Self::parse_chart(req, chart)?;

        let market_cap = if req.include_market_cap {
            self.fetch_market_cap(&req.ticker)
        } else {
            None
        };

        Ok(Quote { series, market_cap })
    }
}
