//! The `prices` subcommand: list stored closing prices.

use anyhow::{anyhow, Result};
use clap::Args;
use stockdata_lib::{validation, Config, PriceFilter};

use crate::output::{print_json, print_prices_table, OutputFormat};

#[derive(Args)]
pub struct PricesArgs {
    /// Only show rows for this ticker
    #[arg(long)]
    pub ticker: Option<String>,

    /// Earliest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Latest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Maximum rows to show
    #[arg(long, default_value = "50")]
    pub limit: i64,
}

pub fn run(args: &PricesArgs, config: &Config, format: &OutputFormat) -> Result<()> {
    let filter = build_filter(args)?;
    let db = config.open_db()?;
    let prices = db.query_prices(&filter)?;

    if prices.is_empty() {
        eprintln!("No stored prices match");
    }

    match format {
        OutputFormat::Table => print_prices_table(&prices),
        OutputFormat::Json => print_json(&prices),
    }
    Ok(())
}

fn build_filter(args: &PricesArgs) -> Result<PriceFilter> {
    let since = args
        .since
        .as_deref()
        .map(validation::validate_date)
        .transpose()?;
    let until = args
        .until
        .as_deref()
        .map(validation::validate_date)
        .transpose()?;
    validation::validate_date_range(since, until)?;

    let ticker = match args.ticker.as_deref().map(str::trim) {
        Some("") => return Err(anyhow!("--ticker must not be empty")),
        other => other.map(str::to_string),
    };

    Ok(PriceFilter {
        ticker,
        since,
        until,
        limit: Some(validation::validate_limit(args.limit)?),
    })
}
