//! Synthetic quote provider — deterministic random-walk data for offline
//! runs and tests.
//!
//! Produces a noisy daily series (drift + volatility) so charts and return
//! statistics look plausible. The walk is seeded from the ticker, so the
//! same request always yields the same series and nothing touches the
//! network.

use super::provider::{FetchError, FetchRequest, Quote, QuoteProvider};
use crate::domain::{PriceBar, PriceSeries};
use chrono::{Datelike, Duration, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BASE_PRICE: f64 = 100.0;
const DAILY_DRIFT: f64 = 0.0004; // ~10% annual
const DAILY_VOL: f64 = 0.012; // ~19% annual

/// Deterministic synthetic data source.
pub struct SyntheticProvider {
    seed: u64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng_for(&self, ticker: &str) -> StdRng {
        // Stable per-ticker stream: fold the ticker bytes into the seed.
        let ticker_hash = ticker
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
                (acc ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
            });
        StdRng::seed_from_u64(self.seed ^ ticker_hash)
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(42)
    }
}

impl QuoteProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, req: &FetchRequest) -> Result<Quote, FetchError> {
        if req.end < req.start {
            return Err(FetchError::EmptyResult {
                ticker: req.ticker.clone(),
                start: req.start,
                end: req.end,
            });
        }

        let mut rng = self.rng_for(&req.ticker);
        let mut close = BASE_PRICE;
        let mut bars = Vec::new();

        let mut date = req.start;
        while date <= req.end {
            let weekday = date.weekday();
            if weekday != Weekday::Sat && weekday != Weekday::Sun {
                let noise: f64 = rng.gen_range(-1.0..1.0);
                let prev = close;
                close *= 1.0 + DAILY_DRIFT + DAILY_VOL * noise;
                let high = prev.max(close) * (1.0 + rng.gen_range(0.0..0.005));
                let low = prev.min(close) * (1.0 - rng.gen_range(0.0..0.005));
                bars.push(PriceBar {
                    date,
                    open: prev,
                    high,
                    low,
                    close,
                });
            }
            date += Duration::days(1);
        }

        if bars.is_empty() {
            return Err(FetchError::EmptyResult {
                ticker: req.ticker.clone(),
                start: req.start,
                end: req.end,
            });
        }

        let series = PriceSeries::new(bars)
            .map_err(|e| FetchError::provider(&req.ticker, format!("invalid series: {e}")))?;

        let market_cap = if req.include_market_cap {
            Some(rng.gen_range(10.0..2500.0))
        } else {
            None
        };

        Ok(Quote { series, market_cap })
    }
}
