use url::Url;

use super::Query;

/// `function` value selecting the daily time series.
pub const TIME_SERIES_DAILY: &str = "TIME_SERIES_DAILY";

/// Query for the `TIME_SERIES_DAILY` function.
///
/// The symbol is passed through untouched; Alpha Vantage decides whether it
/// names a real equity.
#[derive(Clone, Debug)]
pub struct DailySeriesQuery {
    pub symbol: String,
}

impl DailySeriesQuery {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
        }
    }
}

impl Query for DailySeriesQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("function", TIME_SERIES_DAILY)
            .append_pair("symbol", &self.symbol)
            .append_pair("datatype", "json");
        url
    }
}
