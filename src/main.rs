mod accuracy;
mod api;
mod config;
mod db;
mod error;
mod identity;
mod joiner;
mod outcome;
mod pipeline;
mod source;
mod types;

use std::sync::Arc;

use sqlx::sqlite::SqliteConnectOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::db::SqliteSource;
use crate::error::Result;
use crate::pipeline::ReportBuilder;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database setup ---
    let options = SqliteConnectOptions::new()
        .filename(&cfg.db_path)
        .create_if_missing(true);
    let pool = sqlx::SqlitePool::connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database ready at {}", cfg.db_path);

    // --- Report pipeline: one process-wide source handle, read-only ---
    let builder = ReportBuilder::new(SqliteSource::new(pool), cfg.reference_zone, cfg.source_timeout);
    info!(
        "Reference zone {} | source timeout {}ms",
        cfg.reference_zone,
        cfg.source_timeout.as_millis(),
    );

    // --- HTTP API server ---
    let api_state = ApiState {
        builder: Arc::new(builder),
        health: Arc::new(HealthState::new()),
        latency: Arc::new(LatencyStats::new()),
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
