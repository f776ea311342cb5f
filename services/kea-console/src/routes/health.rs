//! Health and capability endpoints

use super::observe;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

/// `GET /api/health`: 200 when `version-get` succeeds, 503 otherwise
pub async fn health(State(state): State<AppState>) -> Response {
    let manager = state.manager().await;
    match manager.kea_version().await {
        Ok(version) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "kea_connection": "ok",
                "version": version,
                "kea_url": manager.url(),
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "kea_connection": "failed",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// `GET /api/commands`
pub async fn commands(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let manager = state.manager().await;
    let capabilities = observe(&state, "list_commands", manager.capabilities().await)?;
    Ok(Json(json!({
        "success": true,
        "commands": capabilities.commands,
        "host_cmds": capabilities.host_cmds,
        "lease_cmds": capabilities.lease_cmds,
    })))
}
