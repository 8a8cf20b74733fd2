use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Readiness probe: returns 200 if the database answers, else 503.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "checks": { "db": "ok" }
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            let reason = if state.config.expose_error_details() {
                e.to_string()
            } else {
                "database unavailable".to_string()
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "checks": { "db": "fail" },
                    "reason": reason
                })),
            )
        }
    }
}
