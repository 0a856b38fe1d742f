use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::error;

use crate::api::health::{HealthSnapshot, HealthState};
use crate::api::latency::{LatencyStats, LatencySummary};
use crate::db::SqliteSource;
use crate::error::Result;
use crate::pipeline::ReportBuilder;
use crate::types::{DailyPerformance, DailyReport, DateScope};

#[derive(Clone)]
pub struct ApiState {
    pub builder: Arc<ReportBuilder<SqliteSource>>,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/report", get(get_report))
        .route("/performance", get(get_performance))
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ReportQuery {
    /// YYYY-MM-DD in the reference zone, or "all". Absent means today.
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_report(
    State(state): State<ApiState>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<DailyReport>> {
    let scope = DateScope::parse(params.date.as_deref(), state.builder.zone(), Utc::now())?;
    let started = Instant::now();
    let result = state.builder.build_report(scope).await;
    state.latency.record(started.elapsed());
    settle(&state, result, "report").map(Json)
}

async fn get_performance(State(state): State<ApiState>) -> Result<Json<Vec<DailyPerformance>>> {
    let result = state.builder.performance().await;
    settle(&state, result, "performance").map(Json)
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthSnapshot> {
    Json(state.health.snapshot())
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencySummary> {
    Json(state.latency.summary())
}

fn settle<T>(state: &ApiState, result: Result<T>, what: &'static str) -> Result<T> {
    match &result {
        Ok(_) => state.health.record_success(now_ns()),
        Err(e) => {
            state.health.record_failure();
            error!(event = "BUILD_FAILED", what, retryable = e.retryable(), "{what} build failed: {e}");
        }
    }
    result
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
