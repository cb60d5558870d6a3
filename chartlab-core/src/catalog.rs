//! Instrument catalog — the fixed set of chartable funds and companies.
//!
//! The catalog is loaded once at process start. A built-in default covers
//! the iShares core ETF lineup plus a handful of large-cap equities;
//! deployments can override it with a TOML file.

use crate::domain::Instrument;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize catalog: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("catalog contains duplicate display name '{0}'")]
    DuplicateName(String),
}

/// The complete instrument catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    instruments: Vec<Instrument>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate display names (lookups are by name).
    pub fn new(instruments: Vec<Instrument>) -> Result<Self, CatalogError> {
        for (i, inst) in instruments.iter().enumerate() {
            if instruments[..i]
                .iter()
                .any(|other| other.display_name == inst.display_name)
            {
                return Err(CatalogError::DuplicateName(inst.display_name.clone()));
            }
        }
        Ok(Self { instruments })
    }

    /// Load a catalog from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a catalog from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let parsed: Catalog = toml::from_str(content)?;
        Self::new(parsed.instruments)
    }

    /// Serialize the catalog to TOML.
    pub fn to_toml(&self) -> Result<String, CatalogError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Look up an instrument by its display name.
    pub fn get(&self, display_name: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|i| i.display_name == display_name)
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// All display names, in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.instruments
            .iter()
            .map(|i| i.display_name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// The built-in dashboard catalog: iShares core ETFs with their expense
    /// ratios (basis points) plus large-cap US equities.
    pub fn default_dashboard() -> Self {
        let instruments = vec![
            Instrument::fund("iShares Core S&P 500 ETF", "IVV", 3.0),
            Instrument::fund("iShares Core S&P Total U.S. Stock Market ETF", "ITOT", 3.0),
            Instrument::fund("iShares Core U.S. Aggregate Bond ETF", "AGG", 4.0),
            Instrument::fund("iShares Core S&P Mid-Cap ETF", "IJH", 5.0),
            Instrument::fund("iShares Core S&P Small-Cap ETF", "IJR", 6.0),
            Instrument::fund("iShares Core Total USD Bond Market ETF", "IUSB", 6.0),
            Instrument::fund("iShares Core MSCI EAFE ETF", "IEFA", 7.0),
            Instrument::fund("iShares Core Dividend Growth ETF", "DGRO", 8.0),
            Instrument::fund("iShares Core MSCI Emerging Markets ETF", "IEMG", 11.0),
            Instrument::fund("iShares Russell 1000 ETF", "IWB", 15.0),
            Instrument::fund("iShares Russell 2000 ETF", "IWM", 19.0),
            Instrument::equity("Apple", "AAPL"),
            Instrument::equity("Microsoft", "MSFT"),
            Instrument::equity("Nvidia", "NVDA"),
            Instrument::equity("Amazon", "AMZN"),
            Instrument::equity("Alphabet", "GOOGL"),
            Instrument::equity("Meta Platforms", "META"),
            Instrument::equity("JPMorgan Chase", "JPM"),
            Instrument::equity("Johnson & Johnson", "JNJ"),
        ];
        Self { instruments }
    }
}
