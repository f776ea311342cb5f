//! Reservation import and export endpoints

use super::{observe, SubnetQuery};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use dhcp_manager::{ImportPayload, ImportSummary};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ImportResponse {
    success: bool,
    message: String,
    #[serde(flatten)]
    summary: ImportSummary,
}

/// `GET /api/reservations/export?subnet_id=`, served as a download
pub async fn export_reservations(
    State(state): State<AppState>,
    query: Result<Query<SubnetQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let manager = state.manager().await;
    let document = observe(
        &state,
        "export_reservations",
        manager.export_reservations(query.subnet_id).await,
    )?;

    let filename = format!(
        "kea-reservations-{}.json",
        Utc::now().format("%Y%m%d-%H%M%S")
    );
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )],
        Json(document),
    ))
}

/// `POST /api/reservations/import`
pub async fn import_reservations(
    State(state): State<AppState>,
    body: Result<Json<ImportPayload>, JsonRejection>,
) -> Result<Json<impl Serialize>, ApiError> {
    let Json(payload) = body?;
    let records = payload.into_records();

    let manager = state.manager().await;
    let summary = observe(
        &state,
        "import_reservations",
        manager.import_reservations(&records).await,
    )?;
    for method in &summary.methods {
        state.metrics().record_reservation_write(method.as_str());
    }

    Ok(Json(ImportResponse {
        success: true,
        message: format!(
            "Imported {} of {} reservations ({} failed)",
            summary.created, summary.total, summary.failed
        ),
        summary,
    }))
}
