use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::db::health_check;
use crate::routes::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub database: String,
}

/// Health check endpoint
/// GET /health
pub async fn health_check_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let healthy = match health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            false
        }
    };

    let label = if healthy { "healthy" } else { "unhealthy" };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            timestamp: chrono::Utc::now(),
            database: label.to_string(),
        }),
    )
}
