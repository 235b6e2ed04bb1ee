//! HTTP client for the Alpha Vantage `/query` API.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::{
    query::{DailySeriesQuery, Query},
    types::RawSeriesResponse,
    Error,
};

/// Request timeout for Alpha Vantage calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// HTTP client for Alpha Vantage.
///
/// Every fetch is a single GET. Nothing is retried: a failed call is
/// reported to the caller as-is.
pub struct Client {
    client: reqwest::Client,
    /// Base URL for the API. Defaults to `https://www.alphavantage.co`.
    base_api_url: String,
    api_key: Option<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_api_url", &self.base_api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Client {
    /// Creates a client pointing at the production Alpha Vantage API.
    ///
    /// A missing key is accepted here; each fetch then fails with
    /// [`Error::MissingApiKey`].
    pub fn new(api_key: Option<String>) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_api_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn get_url(&self, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(&format!("{}/query", self.base_api_url))?;
        Ok(query.add_to_url(&url))
    }

    /// Fetches the daily time series for `symbol`.
    ///
    /// Sends `function=TIME_SERIES_DAILY`, `symbol`, `apikey` and
    /// `datatype=json`. The body is returned unparsed beyond "is a JSON
    /// object"; interpreting the series is left to the caller.
    pub async fn fetch_daily_series(&self, symbol: &str) -> Result<RawSeriesResponse, Error> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingApiKey)?;

        let url = self.get_url(&DailySeriesQuery::new(symbol))?;
        tracing::debug!("GET {} (symbol {})", url, symbol);

        let resp = self
            .client
            .get(url)
            .query(&[("apikey", api_key)])
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Alpha Vantage: {}", e);
                Error::Network(e)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Network(e)
        })?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::InvalidApiKey {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<RawSeriesResponse>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse response: {} | body: {}", e, snippet);
            Error::InvalidJson(format!("{} | body: {}", e, snippet))
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        None => body.to_string(),
        Some((idx, _)) => format!("{}...[truncated]", &body[..idx]),
    }
}
