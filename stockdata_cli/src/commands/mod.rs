//! CLI subcommand implementations.

pub mod ingest;
pub mod prices;
pub mod serve;
