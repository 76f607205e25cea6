//! Health endpoint — liveness only, never touches the assistant service.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /health` — reports the process is up.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        service: state.config.service_name.clone(),
        version: relay_core::version().to_string(),
    })
}
