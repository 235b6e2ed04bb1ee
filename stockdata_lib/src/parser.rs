//! Turns an Alpha Vantage daily series payload into [`DailyPriceRecord`]s.
//!
//! Parsing is all-or-nothing: a single unusable entry fails the whole
//! payload. Records come out in the payload's own key order (newest first
//! for Alpha Vantage); nothing is re-sorted.

use alphavantage_api::types::{
    provider_notice, RawSeriesResponse, SeriesMeta, CLOSE_FIELD, DAILY_SERIES_KEY,
};
use chrono::NaiveDate;
use serde_json::Value;

use crate::record::{DailyPriceRecord, TickerSymbol};

/// Why a provider payload could not be turned into price records.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The payload has no `Time Series (Daily)` key. `notice` carries the
    /// provider's own explanation when it sent one.
    #[error("missing \"Time Series (Daily)\" in provider response{}", fmt_notice(.notice))]
    MissingSeriesKey { notice: Option<String> },
    /// The series key exists but does not hold an object of dated entries.
    #[error("\"Time Series (Daily)\" is not an object")]
    MalformedSeries,
    /// One dated entry is unusable.
    #[error("malformed record for {date}: {reason}")]
    MalformedRecord { date: String, reason: String },
}

fn fmt_notice(notice: &Option<String>) -> String {
    match notice {
        Some(text) => format!(" (provider said: {})", text),
        None => String::new(),
    }
}

/// Parses every dated entry of `raw` into a record for `ticker`.
///
/// An empty series yields an empty vector; a missing series is an error.
pub fn parse_daily_series(
    ticker: &TickerSymbol,
    raw: &RawSeriesResponse,
) -> Result<Vec<DailyPriceRecord>, ParseError> {
    let series = match raw.get(DAILY_SERIES_KEY) {
        Some(Value::Object(series)) => series,
        Some(_) => return Err(ParseError::MalformedSeries),
        None => {
            return Err(ParseError::MissingSeriesKey {
                notice: provider_notice(raw).map(str::to_string),
            })
        }
    };

    if let Some(meta) = SeriesMeta::from_response(raw) {
        if meta.symbol != ticker.as_str() {
            tracing::warn!(
                "provider reports symbol {} for requested ticker {}",
                meta.symbol,
                ticker
            );
        }
    }

    let mut records = Vec::with_capacity(series.len());
    for (date_key, entry) in series {
        let malformed = |reason: &str| ParseError::MalformedRecord {
            date: date_key.clone(),
            reason: reason.to_string(),
        };

        let date = NaiveDate::parse_from_str(date_key, "%Y-%m-%d")
            .map_err(|_| malformed("date is not YYYY-MM-DD"))?;

        let close = match entry.get(CLOSE_FIELD) {
            Some(value) => parse_close(value).ok_or_else(|| {
                malformed(&format!("\"{}\" is not a number: {}", CLOSE_FIELD, value))
            })?,
            None => return Err(malformed(&format!("missing \"{}\"", CLOSE_FIELD))),
        };

        let record = DailyPriceRecord::new(ticker.clone(), date, close)
            .ok_or_else(|| malformed(&format!("close must be positive, got {}", close)))?;
        records.push(record);
    }

    Ok(records)
}

/// Alpha Vantage sends prices as strings ("101.5000"); plain JSON numbers
/// are accepted too.
fn parse_close(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
