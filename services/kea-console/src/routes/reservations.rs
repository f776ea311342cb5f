//! Reservation endpoints

use super::{observe, SubnetQuery};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use dhcp_manager::ReservationForm;
use serde_json::{json, Value};
use tracing::info;

/// `GET /api/reservations?subnet_id=`
pub async fn list_reservations(
    State(state): State<AppState>,
    query: Result<Query<SubnetQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let manager = state.manager().await;
    let reservations = observe(
        &state,
        "list_reservations",
        manager.list_reservations(query.subnet_id).await,
    )?;

    Ok(Json(json!({
        "success": true,
        "count": reservations.len(),
        "reservations": reservations,
    })))
}

/// `POST /api/promote` and `POST /api/reservations`
pub async fn create_reservation(
    State(state): State<AppState>,
    body: Result<Json<ReservationForm>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(form) = body?;
    info!("Promoting lease: IP={}, MAC={}", form.ip_address, form.hw_address);

    let manager = state.manager().await;
    let outcome = observe(
        &state,
        "create_reservation",
        manager.create_reservation(&form).await,
    )?;
    state
        .metrics()
        .record_reservation_write(outcome.method.as_str());

    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Successfully promoted {} to reservation",
            outcome.reservation.ip_address
        ),
        "reservation": outcome.reservation,
        "method": outcome.method,
    })))
}

/// `DELETE /api/reservation/{ip}?subnet_id=`
pub async fn delete_reservation(
    State(state): State<AppState>,
    ip: Result<Path<String>, PathRejection>,
    query: Result<Query<SubnetQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(ip) = ip?;
    let Query(query) = query?;

    let manager = state.manager().await;
    let method = observe(
        &state,
        "delete_reservation",
        manager.delete_reservation(&ip, query.subnet_id).await,
    )?;
    state.metrics().record_reservation_write(method.as_str());

    Ok(Json(json!({
        "success": true,
        "message": format!("Successfully deleted reservation for {}", ip),
        "method": method,
    })))
}
