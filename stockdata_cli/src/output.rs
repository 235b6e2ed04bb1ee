use stockdata_lib::{IngestSummary, StoredPrice};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Close")]
    close: String,
}

fn build_price_rows(prices: &[StoredPrice]) -> Vec<PriceRow> {
    prices
        .iter()
        .map(|p| PriceRow {
            id: p.id,
            ticker: p.ticker.clone(),
            date: p.date.format("%Y-%m-%d").to_string(),
            close: format_close(p.close),
        })
        .collect()
}

pub fn print_prices_table(prices: &[StoredPrice]) {
    let mut table = Table::new(build_price_rows(prices));
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_summary(summary: &IngestSummary, format: &OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "message": summary.message(),
            "ticker": summary.ticker,
            "rows_written": summary.rows_written,
        })),
        OutputFormat::Table => println!(
            "{} ({} rows for {})",
            summary.message(),
            summary.rows_written,
            summary.ticker
        ),
    }
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_close(close: f64) -> String {
    format!("{:.4}", close)
}
