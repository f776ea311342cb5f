//! Axum router configuration
//!
//! ```text
//! /api/health                    - Control Agent reachability
//! /api/commands                  - loaded hook libraries
//! /api/leases                    - active leases
//! /api/reservations[/export|/import], /api/promote, /api/reservation/{ip}
//! /api/subnets[/{id}]            - subnet listing and settings
//! /api/config                    - console configuration
//! /metrics                       - Prometheus exposition
//! ```

pub mod health;
pub mod leases;
pub mod reservations;
pub mod settings;
pub mod subnets;
pub mod transfer;

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::Router;
use dhcp_manager::translate::subnet_id_from_number_or_string;
use dhcp_manager::ManagerError;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// `?subnet_id=` filter shared by the listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SubnetQuery {
    #[serde(default, deserialize_with = "subnet_id_from_number_or_string")]
    pub subnet_id: Option<u32>,
}

/// Build the complete router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/commands", get(health::commands))
        .route("/api/leases", get(leases::list_leases))
        .route(
            "/api/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/api/promote", post(reservations::create_reservation))
        .route("/api/reservation/{ip}", delete(reservations::delete_reservation))
        .route("/api/reservations/export", get(transfer::export_reservations))
        .route("/api/reservations/import", post(transfer::import_reservations))
        .route("/api/subnets", get(subnets::list_subnets))
        .route(
            "/api/subnets/{id}",
            get(subnets::get_subnet).put(subnets::update_subnet),
        )
        .route(
            "/api/config",
            get(settings::get_config).post(settings::save_config),
        )
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Count the outcome of a manager call and convert its error
pub(crate) fn observe<T>(
    state: &AppState,
    operation: &str,
    result: Result<T, ManagerError>,
) -> Result<T, ApiError> {
    state.metrics().record_operation(operation, result.is_ok());
    result.map_err(ApiError::from)
}

async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics()
        .gather()
        .map_err(|e| ApiError::Internal(format!("Failed to encode metrics: {}", e)))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
