//! Error types for the ingestion pipeline.

use std::fmt;

use crate::db::DbError;
use crate::parser::ParseError;

/// Errors produced by an ingestion, one variant per failure class.
///
/// Nothing here is retried or recovered locally; every variant reaches the
/// caller of [`crate::Ingestor::ingest`] unchanged.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    /// User-provided input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The provider could not be reached, rejected the key, answered non-2xx,
    /// or sent a 2xx body that is not a JSON object.
    #[error("Provider error: {0}")]
    Provider(#[from] alphavantage_api::Error),
    /// The provider answered, but not with a usable daily series.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    /// The storage transaction could not commit.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

/// Stable, coarse classification of an [`IngestError`], for boundary layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ProviderUnavailable,
    ProviderAuth,
    ParseFailure,
    StorageFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::ProviderAuth => "provider_auth",
            Self::ParseFailure => "parse_failure",
            Self::StorageFailure => "storage_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Provider(e) if e.is_auth() => ErrorKind::ProviderAuth,
            Self::Provider(e) if e.is_payload() => ErrorKind::ParseFailure,
            Self::Provider(_) => ErrorKind::ProviderUnavailable,
            Self::Parse(_) => ErrorKind::ParseFailure,
            Self::Storage(_) => ErrorKind::StorageFailure,
        }
    }
}
