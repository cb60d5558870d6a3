//! Data layer: provider trait, Yahoo Finance and synthetic providers,
//! in-memory TTL cache.

pub mod cache;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use cache::QuoteCache;
pub use provider::{FetchError, FetchRequest, Quote, QuoteProvider};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
