//! Library layer for stockdata: ingest Alpha Vantage daily prices into SQLite.
//!
//! Wraps the `alphavantage_api` client with payload parsing, a transactional
//! SQLite writer, the ingestion pipeline that ties them together, and the
//! HTTP router exposing it.

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod record;
pub mod server;
pub mod validation;

pub use alphavantage_api;

pub use config::Config;
pub use db::{Db, DbError, PriceFilter, StoredPrice};
pub use error::{ErrorKind, IngestError};
pub use ingest::{IngestStage, IngestSummary, Ingestor};
pub use parser::{parse_daily_series, ParseError};
pub use record::{DailyPriceRecord, TickerSymbol};
