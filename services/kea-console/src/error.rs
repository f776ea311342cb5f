//! HTTP error responses
//!
//! Every failure is answered with `{"success": false, "error": "..."}` and
//! a status code chosen from the kind of failure.

use crate::config::ConfigError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dhcp_manager::ManagerError;
use kea_client::KeaError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Request body or query could not be used
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<KeaError> for ApiError {
    fn from(err: KeaError) -> Self {
        ApiError::Manager(ManagerError::Kea(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn kea_status(err: &KeaError) -> StatusCode {
    match err {
        KeaError::Http(_) | KeaError::Api(_) | KeaError::Authentication(_) => {
            StatusCode::BAD_GATEWAY
        }
        KeaError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        KeaError::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
        KeaError::Conflict { .. } => StatusCode::CONFLICT,
        KeaError::Serialization(_) | KeaError::CommandFailed { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Manager(err) => match err {
                ManagerError::Validation(_) | ManagerError::OutOfSubnet { .. } => {
                    StatusCode::BAD_REQUEST
                }
                ManagerError::SubnetNotFound(_) | ManagerError::NotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                ManagerError::Conflict(_) => StatusCode::CONFLICT,
                ManagerError::HookUnavailable(_) => StatusCode::NOT_IMPLEMENTED,
                ManagerError::Kea(kea) => kea_status(kea),
                ManagerError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Config(ConfigError::Invalid(_)) => StatusCode::BAD_REQUEST,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }

        (
            status,
            Json(json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
