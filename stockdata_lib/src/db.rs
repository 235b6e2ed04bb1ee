//! SQLite storage for daily closing prices.

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::record::{DailyPriceRecord, TickerSymbol};

/// Schema version written to `PRAGMA user_version` after `init`.
const SCHEMA_VERSION: i32 = 1;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("date parse error: {0}")]
    Date(#[from] chrono::ParseError),
    #[error("database handle poisoned by a panicked writer")]
    Poisoned,
    #[error("unsupported database URL scheme \"{0}\"; only sqlite is supported")]
    UnsupportedScheme(String),
    #[error("record for {found} cannot be stored under {expected}")]
    TickerMismatch { expected: String, found: String },
}

pub struct Db {
    conn: Connection,
}

/// A price row as stored, including its auto-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredPrice {
    pub id: i64,
    pub ticker: String,
    pub date: NaiveDate,
    pub close: f64,
}

/// Filter for [`Db::query_prices`]. Results are newest first.
#[derive(Debug, Clone, Default)]
pub struct PriceFilter {
    pub ticker: Option<String>,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub limit: Option<i64>,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        Self::configure(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self, DbError> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for tests).
    #[doc(hidden)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Creates the `stocks` table and its indexes if they are missing.
    pub fn init(&self) -> Result<(), DbError> {
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;

        if version < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(())
    }

    /// Appends `records` for `ticker` in a single transaction.
    ///
    /// Either every row is committed or none is: the first failing insert
    /// returns early, dropping the transaction, which rolls it back. Rows
    /// already present for the same (ticker, date) are left alone and new
    /// ones are added next to them. Every record must belong to `ticker`;
    /// a stray one fails the batch before anything is written.
    pub fn insert_daily_prices(
        &mut self,
        ticker: &TickerSymbol,
        records: &[DailyPriceRecord],
    ) -> Result<usize, DbError> {
        if let Some(stray) = records.iter().find(|r| r.ticker() != ticker) {
            return Err(DbError::TickerMismatch {
                expected: ticker.to_string(),
                found: stray.ticker().to_string(),
            });
        }

        let tx = self.conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt =
                tx.prepare("INSERT INTO stocks (ticker, date, close) VALUES (?1, ?2, ?3)")?;
            for record in records {
                stmt.execute(params![
                    ticker.as_str(),
                    record.date().format("%Y-%m-%d").to_string(),
                    record.close(),
                ])?;
                count += 1;
            }
        }
        tx.commit()?;
        Ok(count)
    }

    /// Count stored rows, optionally for one ticker.
    pub fn count_prices(&self, ticker: Option<&str>) -> Result<i64, DbError> {
        let count: i64 = match ticker {
            Some(ticker) => self.conn.query_row(
                "SELECT COUNT(*) FROM stocks WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM stocks", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    /// Query stored prices, newest date first (insertion order within a date).
    pub fn query_prices(&self, filter: &PriceFilter) -> Result<Vec<StoredPrice>, DbError> {
        let mut sql = String::from("SELECT id, ticker, date, close FROM stocks WHERE 1=1");

        let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        let mut param_idx = 1;

        if let Some(ref ticker) = filter.ticker {
            sql.push_str(&format!(" AND ticker = ?{}", param_idx));
            params_vec.push(Box::new(ticker.clone()));
            param_idx += 1;
        }
        if let Some(since) = filter.since {
            sql.push_str(&format!(" AND date >= ?{}", param_idx));
            params_vec.push(Box::new(since.format("%Y-%m-%d").to_string()));
            param_idx += 1;
        }
        if let Some(until) = filter.until {
            sql.push_str(&format!(" AND date <= ?{}", param_idx));
            params_vec.push(Box::new(until.format("%Y-%m-%d").to_string()));
        }

        sql.push_str(" ORDER BY date DESC, id ASC");

        if let Some(n) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }

        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (id, ticker, date, close) = row?;
            result.push(StoredPrice {
                id,
                ticker,
                date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")?,
                close,
            });
        }
        Ok(result)
    }
}
