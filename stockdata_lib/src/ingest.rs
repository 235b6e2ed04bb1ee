//! Fetch, parse and store one ticker's daily series.
//!
//! [`Ingestor::ingest`] runs `Fetching -> Parsing -> Writing -> Done`.
//! The first failing stage ends the run; since nothing is written before
//! `Writing`, there is never anything to undo. Every call makes one
//! provider request and opens at most one storage transaction.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::config::Config;
use crate::db::{Db, DbError};
use crate::error::IngestError;
use crate::parser::parse_daily_series;
use crate::record::{DailyPriceRecord, TickerSymbol};

pub const SUCCESS_MESSAGE: &str = "Stock data inserted successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Fetching,
    Parsing,
    Writing,
    Done,
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Writing => "writing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    pub ticker: TickerSymbol,
    pub rows_written: usize,
}

impl IngestSummary {
    pub fn message(&self) -> &'static str {
        SUCCESS_MESSAGE
    }
}

/// Runs ingestions against one provider client and one shared store.
///
/// Concurrent calls are fine. They share nothing but the store handle, and
/// two runs for the same ticker simply both append their rows.
pub struct Ingestor {
    client: alphavantage_api::Client,
    db: Arc<Mutex<Db>>,
}

impl Ingestor {
    pub fn new(client: alphavantage_api::Client, db: Arc<Mutex<Db>>) -> Self {
        Self { client, db }
    }

    /// Opens the configured store and builds the provider client.
    pub fn from_config(config: &Config) -> Result<Self, IngestError> {
        let client = config.provider_client()?;
        let db = config.open_db()?;
        Ok(Self::new(client, Arc::new(Mutex::new(db))))
    }

    pub async fn ingest(&self, ticker: &str) -> Result<IngestSummary, IngestError> {
        let ticker = TickerSymbol::parse(ticker)?;

        let result = self.run(&ticker).await;
        match &result {
            Ok(summary) => tracing::info!(
                "ingested {} rows for {}",
                summary.rows_written,
                summary.ticker
            ),
            Err(e) => tracing::warn!("ingestion for {} failed ({}): {}", ticker, e.kind(), e),
        }
        result
    }

    async fn run(&self, ticker: &TickerSymbol) -> Result<IngestSummary, IngestError> {
        log_stage(ticker, IngestStage::Fetching);
        let raw = self.client.fetch_daily_series(ticker.as_str()).await?;

        log_stage(ticker, IngestStage::Parsing);
        let records = parse_daily_series(ticker, &raw)?;

        log_stage(ticker, IngestStage::Writing);
        let rows_written = self.write(ticker, &records)?;

        log_stage(ticker, IngestStage::Done);
        Ok(IngestSummary {
            ticker: ticker.clone(),
            rows_written,
        })
    }

    /// Synchronous on purpose: the store lock must never be held across an await.
    fn write(
        &self,
        ticker: &TickerSymbol,
        records: &[DailyPriceRecord],
    ) -> Result<usize, IngestError> {
        let mut db = self.db.lock().map_err(|_| DbError::Poisoned)?;
        Ok(db.insert_daily_prices(ticker, records)?)
    }
}

fn log_stage(ticker: &TickerSymbol, stage: IngestStage) {
    tracing::debug!("{}: {}", ticker, stage);
}
