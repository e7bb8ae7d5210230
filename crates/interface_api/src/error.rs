//! API error handling
//!
//! Translates every lower-layer failure into the response envelope. The
//! mapping that matters for plan synchronization:
//!
//! - `PlanSyncError::NotFound` -> 404
//! - `PlanSyncError::RemoteFailure` -> 422, provider message passed through
//!   verbatim so the caller sees why the billing provider declined
//! - `PlanSyncError::Inconsistent` -> 500 with the distinct code
//!   `inconsistent_state`
//! - validation failures -> 422
//! - database/storage failures -> 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use domain_billing::PlanSyncError;
use infra_db::DatabaseError;

use crate::response::ApiResponse;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    UnprocessableEntity(String),

    /// Remote and local state disagree after a partial two-phase write
    #[error("{0}")]
    InconsistentState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", msg)
            }
            ApiError::InconsistentState(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "inconsistent_state",
                msg,
            ),
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
            ApiError::Database(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", msg)
            }
        };

        let body = ApiResponse::<serde_json::Value>::err(message, code);
        (status, Json(body)).into_response()
    }
}

impl From<PlanSyncError> for ApiError {
    fn from(err: PlanSyncError) -> Self {
        match err {
            PlanSyncError::NotFound(_) => ApiError::NotFound("Plan not found".to_string()),
            PlanSyncError::RemoteFailure(message) => ApiError::UnprocessableEntity(message),
            inconsistent @ PlanSyncError::Inconsistent { .. } => {
                ApiError::InconsistentState(inconsistent.to_string())
            }
            PlanSyncError::Storage(e) => ApiError::Database(e.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        if err.is_not_found() {
            // Handlers usually pre-empt this with an entity-specific message;
            // this covers the remaining paths.
            ApiError::NotFound(err.to_string())
        } else if err.is_constraint_violation() {
            ApiError::Conflict(err.to_string())
        } else {
            ApiError::Database(err.to_string())
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}
