//! Plan handlers
//!
//! Mutations never touch the repository directly; they go through the
//! `PlanSyncManager` so the billing provider is always updated first. The
//! error mapping (remote rejection -> 422, missing plan -> 404, divergence ->
//! 500 `inconsistent_state`) lives in [`crate::error`].

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::PlanId;

use crate::dto::plan::{CreatePlanRequest, PlanResponse, UpdatePlanRequest};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

/// Creates a plan with the billing provider and persists it locally
pub async fn create_plan(
    State(state): State<AppState>,
    Json(request): Json<CreatePlanRequest>,
) -> Result<Json<ApiResponse<PlanResponse>>, ApiError> {
    request.validate()?;
    let plan = state.plans.create(request.into_new_plan()?).await?;
    Ok(Json(ApiResponse::ok(
        plan.into(),
        "Plan saved successfully",
    )))
}

/// Lists all plans
pub async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlanResponse>>>, ApiError> {
    let plans = state.plans.list().await?;
    let plans: Vec<PlanResponse> = plans.into_iter().map(PlanResponse::from).collect();
    Ok(Json(ApiResponse::ok(
        plans,
        "Plans retrieved successfully",
    )))
}

/// Gets a plan by id
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlanResponse>>, ApiError> {
    let plan = state.plans.get(PlanId::from_uuid(id)).await?;
    Ok(Json(ApiResponse::ok(
        plan.into(),
        "Plan retrieved successfully",
    )))
}

/// Updates a plan, remote first
pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<Json<ApiResponse<PlanResponse>>, ApiError> {
    request.validate()?;
    let plan = state
        .plans
        .update(PlanId::from_uuid(id), request.into_patch()?)
        .await?;
    Ok(Json(ApiResponse::ok(
        plan.into(),
        "Plan updated successfully",
    )))
}

/// Deletes a plan, remote first; responds with the confirmed id
pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlanId>>, ApiError> {
    let deleted = state.plans.delete(PlanId::from_uuid(id)).await?;
    Ok(Json(ApiResponse::ok(
        deleted,
        "Plan deleted successfully",
    )))
}
