//! Process configuration, read once at startup.

use std::path::PathBuf;

use crate::db::{Db, DbError};

pub const API_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const BASE_URL_VAR: &str = "ALPHA_VANTAGE_BASE_URL";

pub const DEFAULT_DATABASE_PATH: &str = "stockdata.db";

/// Settings for the provider client and the store.
///
/// Built once at process start and handed by reference to whatever needs it.
#[derive(Clone)]
pub struct Config {
    /// Alpha Vantage key. `None` is allowed: startup succeeds and every
    /// ingestion then fails with an auth error.
    pub api_key: Option<String>,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Overrides the provider base URL (mock servers, proxies).
    pub provider_base_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("database_path", &self.database_path)
            .field("provider_base_url", &self.provider_base_url)
            .finish()
    }
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(API_KEY_VAR);
        if api_key.is_none() {
            tracing::warn!(
                "{} is not set; every ingestion will fail until it is provided",
                API_KEY_VAR
            );
        }

        let database_path = get(DATABASE_URL_VAR)
            .map(|url| {
                if let Some(scheme) = foreign_scheme(&url) {
                    tracing::warn!(
                        "{} uses the {} scheme; only sqlite databases can be opened",
                        DATABASE_URL_VAR,
                        scheme
                    );
                }
                database_path_from_url(&url)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        Self {
            api_key,
            database_path,
            provider_base_url: get(BASE_URL_VAR),
        }
    }

    /// Builds the provider client described by this configuration.
    pub fn provider_client(&self) -> Result<alphavantage_api::Client, alphavantage_api::Error> {
        match &self.provider_base_url {
            Some(url) => alphavantage_api::Client::with_base_url(url, self.api_key.clone()),
            None => alphavantage_api::Client::new(self.api_key.clone()),
        }
    }

    /// Opens the configured database and makes sure the schema exists.
    pub fn open_db(&self) -> Result<Db, DbError> {
        if let Some(scheme) = self.database_path.to_str().and_then(foreign_scheme) {
            return Err(DbError::UnsupportedScheme(scheme.to_string()));
        }
        let db = Db::open(&self.database_path)?;
        db.init()?;
        Ok(db)
    }
}

/// Accepts a bare path or a `sqlite://` / `sqlite:` URL.
fn database_path_from_url(url: &str) -> PathBuf {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    PathBuf::from(path)
}

/// The scheme of a `scheme://` URL naming something other than SQLite.
fn foreign_scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once("://")?;
    let is_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (is_scheme && scheme != "sqlite").then_some(scheme)
}
