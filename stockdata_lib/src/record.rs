//! Ticker and daily price value types.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::IngestError;

/// An opaque equity identifier.
///
/// The only rule is "non-empty after trimming". Case, punctuation and length
/// are passed through to the provider untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    pub fn parse(input: &str) -> Result<Self, IngestError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IngestError::InvalidInput(
                "ticker must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TickerSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One day's closing price for a ticker. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPriceRecord {
    ticker: TickerSymbol,
    date: NaiveDate,
    close: f64,
}

impl DailyPriceRecord {
    /// Returns `None` unless `close` is finite and strictly positive.
    pub fn new(ticker: TickerSymbol, date: NaiveDate, close: f64) -> Option<Self> {
        if !close.is_finite() || close <= 0.0 {
            return None;
        }
        Some(Self {
            ticker,
            date,
            close,
        })
    }

    pub fn ticker(&self) -> &TickerSymbol {
        &self.ticker
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn close(&self) -> f64 {
        self.close
    }
}
