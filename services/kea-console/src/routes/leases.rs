use super::{observe, SubnetQuery};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};

/// `GET /api/leases?subnet_id=`
pub async fn list_leases(
    State(state): State<AppState>,
    query: Result<Query<SubnetQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let manager = state.manager().await;
    let leases = observe(&state, "list_leases", manager.list_leases(query.subnet_id).await)?;

    Ok(Json(json!({
        "success": true,
        "count": leases.len(),
        "leases": leases,
    })))
}
