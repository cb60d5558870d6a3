//! ChartLab Core — the fetch/cache/compute pipeline behind the dashboard.
//!
//! This crate turns a selection of instruments and indicator kinds into
//! rendered chart images:
//! - Instrument catalog (built-in default, TOML-overridable)
//! - In-memory TTL quote cache with LRU eviction
//! - Quote providers (Yahoo Finance, deterministic synthetic)
//! - Pure indicator engine (SMA, MACD, trailing annual return, N-year
//!   point return)
//! - Bounded parallel dispatcher with completion-order collection
//! - Chart renderer trait with a plotters-backed PNG implementation

pub mod catalog;
pub mod data;
pub mod dispatch;
pub mod domain;
pub mod indicators;
pub mod render;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything that crosses the worker-pool boundary
    /// is Send + Sync. If any type fails this check, the build breaks
    /// immediately instead of when the dispatcher grows a new code path.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Instrument>();
        require_sync::<domain::Instrument>();
        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();

        require_send::<data::Quote>();
        require_sync::<data::Quote>();
        require_send::<data::QuoteCache>();
        require_sync::<data::QuoteCache>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();

        require_send::<indicators::IndicatorKind>();
        require_sync::<indicators::IndicatorKind>();
        require_send::<indicators::IndicatorPanel>();
        require_sync::<indicators::IndicatorPanel>();

        require_send::<dispatch::ChartRequest>();
        require_sync::<dispatch::ChartRequest>();
        require_send::<dispatch::ChartResult>();
        require_sync::<dispatch::ChartResult>();

        require_send::<render::RenderedChart>();
        require_sync::<render::RenderedChart>();
        require_send::<render::PngChartRenderer>();
        require_sync::<render::PngChartRenderer>();
    }
}
