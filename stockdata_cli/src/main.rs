mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stockdata_lib::Config;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stockdata")]
#[command(about = "Ingest Alpha Vantage daily closing prices into SQLite")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// SQLite database path (overrides DATABASE_URL)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the POST /stock_data/ ingestion endpoint
    Serve(commands::serve::ServeArgs),
    /// Ingest one ticker's daily series and exit
    Ingest(commands::ingest::IngestArgs),
    /// List stored closing prices
    Prices(commands::prices::PricesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stockdata=info".parse()?)
                .add_directive("stockdata_lib=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let mut config = Config::from_env();
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    match &cli.command {
        Commands::Serve(args) => commands::serve::run(args, &config).await?,
        Commands::Ingest(args) => commands::ingest::run(args, &config, &format).await?,
        Commands::Prices(args) => commands::prices::run(args, &config, &format)?,
    }

    Ok(())
}
