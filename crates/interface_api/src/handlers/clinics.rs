//! Clinic handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use infra_db::repositories::ClinicRepository;

use crate::dto::clinic::{ClinicResponse, CreateClinicRequest, UpdateClinicRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

fn repo(state: &AppState) -> ClinicRepository {
    ClinicRepository::new(state.pool.clone())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Clinic not found".to_string())
}

/// Creates a clinic
pub async fn create_clinic(
    State(state): State<AppState>,
    Json(request): Json<CreateClinicRequest>,
) -> Result<Json<ApiResponse<ClinicResponse>>, ApiError> {
    request.validate()?;
    let row = repo(&state).insert(request.into()).await?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Clinic saved successfully",
    )))
}

/// Lists all clinics
pub async fn list_clinics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ClinicResponse>>>, ApiError> {
    let rows = repo(&state).list().await?;
    let clinics: Vec<ClinicResponse> = rows.into_iter().map(ClinicResponse::from).collect();
    Ok(Json(ApiResponse::ok(
        clinics,
        "Clinics retrieved successfully",
    )))
}

/// Gets a clinic by id
pub async fn get_clinic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClinicResponse>>, ApiError> {
    let row = repo(&state).find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Clinic retrieved successfully",
    )))
}

/// Updates a clinic
pub async fn update_clinic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateClinicRequest>,
) -> Result<Json<ApiResponse<ClinicResponse>>, ApiError> {
    request.validate()?;
    let row = repo(&state)
        .update(id, request.into())
        .await
        .map_err(|e| if e.is_not_found() { not_found() } else { e.into() })?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Clinic updated successfully",
    )))
}

/// Deletes a clinic
pub async fn delete_clinic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, ApiError> {
    repo(&state)
        .delete(id)
        .await
        .map_err(|e| if e.is_not_found() { not_found() } else { e.into() })?;
    Ok(Json(ApiResponse::ok(id, "Clinic deleted successfully")))
}
