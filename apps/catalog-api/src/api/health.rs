//! Readiness endpoint checking both backing stores.

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

/// GET /ready - readiness probe
///
/// Pings PostgreSQL and MongoDB concurrently; 503 with per-store detail
/// when either is unreachable.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "mongodb",
            Box::pin(async {
                database::mongodb::check_health(&state.mongo_client)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
    ];

    match run_health_checks(checks).await {
        Ok((status, body)) => (status, body),
        Err((status, body)) => (status, body),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
