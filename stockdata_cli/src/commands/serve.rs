//! The `serve` subcommand: run the HTTP ingestion endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use stockdata_lib::server::create_app;
use stockdata_lib::{Config, Ingestor};

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,
}

pub async fn run(args: &ServeArgs, config: &Config) -> Result<()> {
    let ingestor = Arc::new(Ingestor::from_config(config)?);
    let app = create_app(ingestor);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(
        "listening on {} (database {})",
        listener.local_addr()?,
        config.database_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last store handle; the connection is closed by now.
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
