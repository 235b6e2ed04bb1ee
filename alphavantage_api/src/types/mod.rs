mod series;
pub use self::series::{
    provider_notice, RawSeriesResponse, SeriesMeta, CLOSE_FIELD, DAILY_SERIES_KEY, META_DATA_KEY,
    NOTICE_KEYS,
};
