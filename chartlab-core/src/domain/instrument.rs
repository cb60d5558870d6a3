//! Instrument: a chartable fund or public company.

use serde::{Deserialize, Serialize};

/// What kind of instrument this is, and the metadata that goes with it.
///
/// Funds carry an annual expense ratio in basis points; equities are
/// annotated with market capitalization at fetch time instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstrumentKind {
    Fund { fee_bps: f64 },
    Equity,
}

/// A catalog entry: human-readable name plus provider ticker.
///
/// Instruments are immutable value objects loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub display_name: String,
    pub ticker: String,
    pub kind: InstrumentKind,
}

impl Instrument {
    pub fn fund(display_name: impl Into<String>, ticker: impl Into<String>, fee_bps: f64) -> Self {
        Self {
            display_name: display_name.into(),
            ticker: ticker.into(),
            kind: InstrumentKind::Fund { fee_bps },
        }
    }

    pub fn equity(display_name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ticker: ticker.into(),
            kind: InstrumentKind::Equity,
        }
    }

    pub fn is_equity(&self) -> bool {
        matches!(self.kind, InstrumentKind::Equity)
    }

    /// Expense ratio in basis points, funds only.
    pub fn fee_bps(&self) -> Option<f64> {
        match self.kind {
            InstrumentKind::Fund { fee_bps } => Some(fee_bps),
            InstrumentKind::Equity => None,
        }
    }

    /// Expense ratio as a percentage (e.g. 3 bps -> 0.03).
    pub fn fee_percent(&self) -> Option<f64> {
        self.fee_bps().map(|bps| bps / 100.0)
    }
}
