//! Message handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use infra_db::repositories::MessageRepository;

use crate::dto::message::{CreateMessageRequest, MessageResponse, UpdateMessageRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

fn repo(state: &AppState) -> MessageRepository {
    MessageRepository::new(state.pool.clone())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Message not found".to_string())
}

/// Creates a message
pub async fn create_message(
    State(state): State<AppState>,
    Json(request): Json<CreateMessageRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    request.validate()?;
    let row = repo(&state).insert(request.into()).await?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Message saved successfully",
    )))
}

/// Lists all messages
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MessageResponse>>>, ApiError> {
    let rows = repo(&state).list().await?;
    let messages: Vec<MessageResponse> = rows.into_iter().map(MessageResponse::from).collect();
    Ok(Json(ApiResponse::ok(
        messages,
        "Messages retrieved successfully",
    )))
}

/// Gets a message by id
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let row = repo(&state).find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Message retrieved successfully",
    )))
}

/// Updates a message
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMessageRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    request.validate()?;
    let row = repo(&state)
        .update(id, request.into())
        .await
        .map_err(|e| if e.is_not_found() { not_found() } else { e.into() })?;
    Ok(Json(ApiResponse::ok(
        row.into(),
        "Message updated successfully",
    )))
}

/// Deletes a message
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, ApiError> {
    repo(&state)
        .delete(id)
        .await
        .map_err(|e| if e.is_not_found() { not_found() } else { e.into() })?;
    Ok(Json(ApiResponse::ok(id, "Message deleted successfully")))
}
