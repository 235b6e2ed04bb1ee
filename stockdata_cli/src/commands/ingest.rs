//! The `ingest` subcommand: fetch one ticker's daily series and store it.

use anyhow::Result;
use clap::Args;
use stockdata_lib::{Config, Ingestor};

use crate::output::{print_summary, OutputFormat};

#[derive(Args)]
pub struct IngestArgs {
    /// Ticker symbol to fetch (passed to the provider as-is)
    #[arg(long)]
    pub ticker: String,
}

pub async fn run(args: &IngestArgs, config: &Config, format: &OutputFormat) -> Result<()> {
    let ingestor = Ingestor::from_config(config)?;
    eprintln!(
        "Ingesting daily prices for {} into {}",
        args.ticker.trim(),
        config.database_path.display()
    );

    let summary = ingestor.ingest(&args.ticker).await?;
    print_summary(&summary, format);
    Ok(())
}
