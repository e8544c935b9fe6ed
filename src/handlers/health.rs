use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Health check for load balancers and monitoring.
///
/// Pings the database with `SELECT 1`; an accounts API that can't reach its
/// users table is not meaningfully up, so a dead pool turns the whole
/// response into a 503 rather than a cheerful 200.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_up = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();

    let (status, response) = if database_up {
        (
            StatusCode::OK,
            HealthResponse {
                status: "healthy".to_string(),
                database: "connected".to_string(),
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "degraded".to_string(),
                database: "unreachable".to_string(),
            },
        )
    };

    (status, Json(response))
}
