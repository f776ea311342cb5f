//! Console configuration endpoints

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::{build_manager, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

/// `GET /api/config`: configuration with the password masked
pub async fn get_config(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let config = state.config().await.sanitized();
    let path = state.config_path();
    let exists = tokio::fs::try_exists(path).await.unwrap_or(false);

    Ok(Json(json!({
        "success": true,
        "config": config,
        "config_path": path.display().to_string(),
        "config_exists": exists,
    })))
}

/// `POST /api/config`: validate, write the file and reconnect to KEA
pub async fn save_config(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;

    let raw = body
        .get("config")
        .filter(|c| c.is_object())
        .ok_or_else(|| ApiError::BadRequest("Configuration object is required".to_string()))?;
    if raw.get("kea").is_none() || raw.get("app").is_none() {
        return Err(ApiError::BadRequest(
            "Configuration must include \"kea\" and \"app\" sections".to_string(),
        ));
    }

    let mut config: AppConfig = serde_json::from_value(raw.clone())
        .map_err(|e| ApiError::BadRequest(format!("Invalid configuration: {}", e)))?;
    config.restore_masked_password(&state.config().await);
    config.validate()?;

    let manager = build_manager(&config)?;
    let path = state.config_path();
    let result = config.save(path).await;
    state.metrics().record_operation("save_config", result.is_ok());
    result?;

    info!("Configuration saved to {}", path.display());
    state.replace(config, manager).await;

    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Configuration saved to {}. KEA client reinitialized with new settings.",
            path.display()
        ),
    })))
}
