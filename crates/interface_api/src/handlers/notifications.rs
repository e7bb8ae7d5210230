//! Notification handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use infra_db::repositories::NotificationRepository;

use crate::dto::notification::{
    CreateNotificationRequest, NotificationResponse, UpdateNotificationRequest,
};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

fn repo(state: &AppState) -> NotificationRepository {
    NotificationRepository::new(state.pool.clone())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Notification not found".to_string())
}

/// Creates a notification
pub async fn create_notification(
    State(state): State<AppState>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<Json<ApiResponse<NotificationResponse>>, ApiError> {
    request.validate()?;
    let row = repo(&state).insert(request.into()).await?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Notification saved successfully",
    )))
}

/// Lists all notifications
pub async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, ApiError> {
    let rows = repo(&state).list().await?;
    let notifications: Vec<NotificationResponse> =
        rows.into_iter().map(NotificationResponse::from).collect();
    Ok(Json(ApiResponse::ok(
        notifications,
        "Notifications retrieved successfully",
    )))
}

/// Gets a notification by id
pub async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NotificationResponse>>, ApiError> {
    let row = repo(&state).find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Notification retrieved successfully",
    )))
}

/// Updates a notification
pub async fn update_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateNotificationRequest>,
) -> Result<Json<ApiResponse<NotificationResponse>>, ApiError> {
    request.validate()?;
    let row = repo(&state)
        .update(id, request.into())
        .await
        .map_err(|e| if e.is_not_found() { not_found() } else { e.into() })?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Notification updated successfully",
    )))
}

/// Deletes a notification
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, ApiError> {
    repo(&state)
        .delete(id)
        .await
        .map_err(|e| if e.is_not_found() { not_found() } else { e.into() })?;
    Ok(Json(ApiResponse::ok(
        id,
        "Notification deleted successfully",
    )))
}
