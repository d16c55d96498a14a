//! HTTP surface: router assembly, health probes and monitoring.

mod choices;
mod operations;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::cache::CacheStats;
use crate::pricing;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/cache/stats", get(cache_stats))
        .route("/choices", get(choices::form_choices))
        .merge(pricing::router())
        .merge(operations::router())
}

/// Liveness probe; says nothing about dependencies
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe; 503 until the database answers
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Cache occupancy for monitoring
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
