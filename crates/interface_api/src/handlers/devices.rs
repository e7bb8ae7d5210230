//! Device handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use infra_db::repositories::DeviceRepository;

use crate::dto::device::{CreateDeviceRequest, DeviceResponse, UpdateDeviceRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

fn repo(state: &AppState) -> DeviceRepository {
    DeviceRepository::new(state.pool.clone())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Device not found".to_string())
}

/// Registers a device
pub async fn create_device(
    State(state): State<AppState>,
    Json(request): Json<CreateDeviceRequest>,
) -> Result<Json<ApiResponse<DeviceResponse>>, ApiError> {
    request.validate()?;
    let row = repo(&state).insert(request.into()).await?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Device saved successfully",
    )))
}

/// Lists all devices
pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DeviceResponse>>>, ApiError> {
    let rows = repo(&state).list().await?;
    let devices: Vec<DeviceResponse> = rows.into_iter().map(DeviceResponse::from).collect();
    Ok(Json(ApiResponse::ok(
        devices,
        "Devices retrieved successfully",
    )))
}

/// Gets a device by id
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeviceResponse>>, ApiError> {
    let row = repo(&state).find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Device retrieved successfully",
    )))
}

/// Updates a device
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDeviceRequest>,
) -> Result<Json<ApiResponse<DeviceResponse>>, ApiError> {
    request.validate()?;
    let row = repo(&state)
        .update(id, request.into())
        .await
        .map_err(|e| if e.is_not_found() { not_found() } else { e.into() })?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Device updated successfully",
    )))
}

/// Deletes a device
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, ApiError> {
    repo(&state)
        .delete(id)
        .await
        .map_err(|e| if e.is_not_found() { not_found() } else { e.into() })?;
    Ok(Json(ApiResponse::ok(id, "Device deleted successfully")))
}
