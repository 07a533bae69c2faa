//! scorecard-im (Import Module) - Bulk performance-metric ingestion service
//!
//! Accepts spreadsheet uploads with arbitrary column layouts, normalizes
//! them against the person directory, and persists per-row with a precise
//! success/failure ledger.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use scorecard_common::config::{resolve_data_folder, ServiceConfig};
use scorecard_im::{build_router, AppState};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5770";

#[derive(Debug, Parser)]
#[command(name = "scorecard-im", about = "Scorecard bulk import service")]
struct Args {
    /// Data folder holding the database (overrides env and config file)
    #[arg(long)]
    data_folder: Option<String>,

    /// Bind address, e.g. 127.0.0.1:5770
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Scorecard Import Module (scorecard-im) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = ServiceConfig::load();

    let data_folder = resolve_data_folder(
        args.data_folder.as_deref(),
        "SCORECARD_DATA_FOLDER",
        &config,
    );
    let db_path = data_folder.join("scorecard.db");
    info!("Database path: {}", db_path.display());

    let pool = scorecard_common::db::init_database(&db_path).await?;

    let state = AppState::with_defaults(pool, config.notify_webhook_url.clone());
    let app = build_router(state);

    let bind_addr = args
        .bind
        .or(config.bind_addr)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("scorecard-im listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
