//! Domain types: price bars, validated price series, instruments.

pub mod instrument;
pub mod series;

pub use instrument::{Instrument, InstrumentKind};
pub use series::{PriceBar, PriceSeries, SeriesError};
