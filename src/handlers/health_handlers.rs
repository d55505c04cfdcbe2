use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use serde_json::json;
use tracing::warn;

use crate::app_state::AppState;

/// Handler for the health check: pings the pool
pub async fn health(Extension(state): Extension<AppState>) -> impl IntoResponse {
    match state.db.ping(&state.request_context()).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
