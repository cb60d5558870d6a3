//! Parallel request dispatcher — fans (instrument, indicator) pairs across
//! a bounded worker pool and collects rendered charts.
//!
//! Each task is fully independent: cache-or-fetch, indicator computation,
//! render. The cache is the only shared state. Results arrive in
//! completion order, not submission order; callers must not assume any
//! particular ordering. A failing task is dropped from the output with a
//! surfaced diagnostic and never aborts its siblings.

use crate::data::{FetchError, FetchRequest, QuoteCache, QuoteProvider};
use crate::domain::{Instrument, InstrumentKind};
use crate::indicators::{build_panel, point_return, IndicatorError, IndicatorKind};
use crate::render::{ChartRenderer, ChartSpec, RenderError, RenderedChart};
use chrono::NaiveDate;
use std::sync::mpsc;
use thiserror::Error;
use tracing::{info, warn};

/// Selection limit: at most this many instruments per dispatch.
pub const MAX_INSTRUMENTS: usize = 5;

/// Upper bound on worker threads; the pool never exceeds the task count.
pub const MAX_WORKERS: usize = 8;

/// Invalid selection combinations, rejected before any task starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("you can select up to {MAX_INSTRUMENTS} instruments at the same time (got {0})")]
    TooManyInstruments(usize),

    #[error("you can only select one indicator when selecting multiple instruments \
             (got {instruments} instruments and {indicators} indicators)")]
    MultipleIndicators { instruments: usize, indicators: usize },
}

/// Why a single chart task was dropped.
#[derive(Debug, Clone, Error)]
pub enum ChartError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The atomic unit of work: one instrument, one indicator.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub instrument: Instrument,
    pub indicator: IndicatorKind,
}

/// One rendered chart.
#[derive(Debug, Clone)]
pub struct ChartResult {
    pub instrument: Instrument,
    pub indicator: IndicatorKind,
    pub image: RenderedChart,
}

/// Outcome of a dispatch: completed charts plus the requests that failed.
///
/// Every request maps to exactly one entry across the two lists.
#[derive(Debug)]
pub struct DispatchSummary {
    pub results: Vec<ChartResult>,
    pub failures: Vec<(ChartRequest, ChartError)>,
}

impl DispatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Expand the selection into tasks and run them across the worker pool.
///
/// Blocks until every task has completed or failed individually. Returns
/// `Err` only for invalid selections; per-task failures land in the
/// summary.
pub fn dispatch_charts(
    provider: &dyn QuoteProvider,
    cache: &QuoteCache,
    renderer: &dyn ChartRenderer,
    instruments: &[Instrument],
    indicators: &[IndicatorKind],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DispatchSummary, ValidationError> {
    validate_selection(instruments.len(), indicators.len())?;

    let requests: Vec<ChartRequest> = instruments
        .iter()
        .flat_map(|instrument| {
            indicators.iter().map(move |&indicator| ChartRequest {
                instrument: instrument.clone(),
                indicator,
            })
        })
        .collect();

    if requests.is_empty() {
        return Ok(DispatchSummary {
            results: Vec::new(),
            failures: Vec::new(),
        });
    }

    // Private pool, never wider than the task list.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(requests.len().min(MAX_WORKERS))
        .thread_name(|i| format!("chartlab-pool-{i}"))
        .build()
        .expect("failed to build dispatcher rayon pool");

    let (tx, rx) = mpsc::channel();

    pool.scope(|scope| {
        for request in &requests {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let outcome = run_chart_task(provider, cache, renderer, request, start, end);
                // The receiver outlives the scope; a failed send means the
                // caller is gone and there is nobody left to report to.
                let _ = tx.send((request.clone(), outcome));
            });
        }
    });
    drop(tx);

    let mut summary = DispatchSummary {
        results: Vec::new(),
        failures: Vec::new(),
    };

    // Channel order == completion order.
    for (request, outcome) in rx {
        match outcome {
            Ok(result) => summary.results.push(result),
            Err(error) => {
                warn!(
                    instrument = %request.instrument.display_name,
                    indicator = request.indicator.label(),
                    %error,
                    "chart task failed"
                );
                summary.failures.push((request, error));
            }
        }
    }

    info!(
        completed = summary.results.len(),
        failed = summary.failures.len(),
        "dispatch finished"
    );

    Ok(summary)
}

fn validate_selection(instruments: usize, indicators: usize) -> Result<(), ValidationError> {
    if instruments > MAX_INSTRUMENTS {
        return Err(ValidationError::TooManyInstruments(instruments));
    }
    if instruments > 1 && indicators > 1 {
        return Err(ValidationError::MultipleIndicators {
            instruments,
            indicators,
        });
    }
    Ok(())
}

/// One task: resolve the series, compute the panel and return statistics,
/// render.
fn run_chart_task(
    provider: &dyn QuoteProvider,
    cache: &QuoteCache,
    renderer: &dyn ChartRenderer,
    request: &ChartRequest,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ChartResult, ChartError> {
    let instrument = &request.instrument;

    let mut fetch_req = FetchRequest::new(instrument.ticker.clone(), start, end);
    if instrument.is_equity() {
        fetch_req = fetch_req.with_market_cap();
    }

    let quote = cache.get_or_fetch(provider, &fetch_req)?;
    let panel = build_panel(request.indicator, &quote.series)?;

    let five_year = point_return(&quote.series, 5)?;
    let ten_year = point_return(&quote.series, 10)?;

    let spec = ChartSpec {
        title: format!(
            "{} ({}) {}",
            instrument.display_name,
            instrument.ticker,
            request.indicator.label()
        ),
        subtitle: annotation(instrument, quote.market_cap),
        x_label: "Date",
        dates: quote.series.dates(),
        panel,
        footer: vec![
            format!("5-Year Return: {five_year:.2}%"),
            format!("10-Year Return: {ten_year:.2}%"),
        ],
    };

    let image = renderer.render(&spec)?;

    Ok(ChartResult {
        instrument: instrument.clone(),
        indicator: request.indicator,
        image,
    })
}

/// Subtitle metadata: expense ratio for funds, market cap for equities.
fn annotation(instrument: &Instrument, market_cap: Option<f64>) -> String {
    match instrument.kind {
        InstrumentKind::Fund { fee_bps } => {
            format!("Expense Ratio: {:.2}%", fee_bps / 100.0)
        }
        InstrumentKind::Equity => match market_cap {
            Some(cap) => format!("Market Cap: ${cap:.1}B"),
            None => "Market Cap: unavailable".to_string(),
        },
    }
}
