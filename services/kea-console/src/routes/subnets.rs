//! Subnet endpoints

use super::observe;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use dhcp_manager::SubnetSettings;
use serde_json::{json, Value};

/// `GET /api/subnets`
pub async fn list_subnets(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let manager = state.manager().await;
    let subnets = observe(&state, "list_subnets", manager.list_subnets().await)?;
    Ok(Json(json!({ "success": true, "subnets": subnets })))
}

/// `GET /api/subnets/{id}`
pub async fn get_subnet(
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let manager = state.manager().await;
    let subnet = observe(&state, "get_subnet", manager.get_subnet(id).await)?;
    Ok(Json(json!({ "success": true, "subnet": subnet })))
}

/// `PUT /api/subnets/{id}`
pub async fn update_subnet(
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
    body: Result<Json<SubnetSettings>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let Json(settings) = body?;

    let manager = state.manager().await;
    let subnet = observe(
        &state,
        "update_subnet",
        manager.update_subnet(id, &settings).await,
    )?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Subnet {} updated", id),
        "subnet": subnet,
    })))
}
