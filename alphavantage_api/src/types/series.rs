use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `/query` response body, kept as an order-preserving JSON object.
///
/// Alpha Vantage lists dates newest first; the map keeps that order so
/// callers see entries exactly as the provider sent them.
pub type RawSeriesResponse = Map<String, Value>;

/// Top-level key holding the per-date entries.
pub const DAILY_SERIES_KEY: &str = "Time Series (Daily)";
/// Top-level key holding request metadata.
pub const META_DATA_KEY: &str = "Meta Data";
/// Closing price field inside each dated entry.
pub const CLOSE_FIELD: &str = "4. close";

/// Keys Alpha Vantage uses instead of a series when it refuses a request.
/// These arrive with HTTP 200.
pub const NOTICE_KEYS: &[&str] = &["Error Message", "Note", "Information"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesMeta {
    #[serde(rename = "1. Information")]
    pub information: String,
    #[serde(rename = "2. Symbol")]
    pub symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    pub last_refreshed: String,
    #[serde(rename = "4. Output Size", default)]
    pub output_size: Option<String>,
    #[serde(rename = "5. Time Zone", default)]
    pub time_zone: Option<String>,
}

impl SeriesMeta {
    /// Reads the `Meta Data` block, if present and well formed.
    pub fn from_response(raw: &RawSeriesResponse) -> Option<Self> {
        raw.get(META_DATA_KEY)
            .and_then(|meta| Self::deserialize(meta).ok())
    }
}

/// Returns the first provider notice (error message, rate-limit note, ...) in the payload.
pub fn provider_notice(raw: &RawSeriesResponse) -> Option<&str> {
    NOTICE_KEYS
        .iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_str))
}
