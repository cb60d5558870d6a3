//! Chart rendering boundary.
//!
//! The pipeline hands a fully-computed [`ChartSpec`] to a [`ChartRenderer`]
//! and gets PNG bytes back. The core does not care which plotting backend
//! sits behind the trait; the dispatcher only needs `Send + Sync` so one
//! renderer can serve every worker.

pub mod png;

pub use png::PngChartRenderer;

use crate::indicators::IndicatorPanel;
use chrono::NaiveDate;
use thiserror::Error;

/// Everything the renderer needs to draw one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// e.g. "iShares Core S&P 500 ETF (IVV) SMA"
    pub title: String,
    /// Fee or market-cap annotation, e.g. "Expense Ratio: 0.03%".
    pub subtitle: String,
    pub x_label: &'static str,
    /// Dates for the x axis, aligned index-for-index with the panel values.
    pub dates: Vec<NaiveDate>,
    pub panel: IndicatorPanel,
    /// Return statistics printed under the chart, one line each.
    pub footer: Vec<String>,
}

/// A rendered raster image.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("chart spec invalid: {0}")]
    InvalidSpec(String),

    #[error("render backend: {0}")]
    Backend(String),

    #[error("png encoding: {0}")]
    Encode(String),
}

/// Renders a [`ChartSpec`] to a raster image.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec) -> Result<RenderedChart, RenderError>;
}
