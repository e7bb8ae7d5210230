//! HTTP API Layer
//!
//! This crate provides the REST API for the clinic backend using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each entity
//! - **Middleware**: Authentication, the company permission gate, audit logging
//! - **DTOs**: Request/Response data transfer objects with validation
//! - **Error Handling**: Consistent `{success, data, message}` envelope
//!
//! Plan routes are special: mutations go through the `PlanSyncManager` so the
//! billing provider is updated before any local write, and they sit behind the
//! company permission gate.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(pool, plans, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use domain_billing::PlanSyncManager;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{clinics, devices, health, messages, notifications, plans};
use crate::middleware::{audit_middleware, auth_middleware, company_gate};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub plans: Arc<PlanSyncManager>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `plans` - Plan sync manager wired to the billing provider and plan store
/// * `config` - API configuration
pub fn create_router(pool: PgPool, plans: Arc<PlanSyncManager>, config: ApiConfig) -> Router {
    let state = AppState {
        pool,
        plans,
        config,
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Clinic routes
    let clinic_routes = Router::new()
        .route("/", post(clinics::create_clinic))
        .route("/", get(clinics::list_clinics))
        .route("/:id", get(clinics::get_clinic))
        .route("/:id", put(clinics::update_clinic))
        .route("/:id", delete(clinics::delete_clinic));

    // Plan routes: billing-sensitive, additionally gated on the company role
    let plan_routes = Router::new()
        .route("/", post(plans::create_plan))
        .route("/", get(plans::list_plans))
        .route("/:id", get(plans::get_plan))
        .route("/:id", put(plans::update_plan))
        .route("/:id", delete(plans::delete_plan))
        .layer(axum_middleware::from_fn(company_gate));

    // Device routes
    let device_routes = Router::new()
        .route("/", post(devices::create_device))
        .route("/", get(devices::list_devices))
        .route("/:id", get(devices::get_device))
        .route("/:id", put(devices::update_device))
        .route("/:id", delete(devices::delete_device));

    // Message routes
    let message_routes = Router::new()
        .route("/", post(messages::create_message))
        .route("/", get(messages::list_messages))
        .route("/:id", get(messages::get_message))
        .route("/:id", put(messages::update_message))
        .route("/:id", delete(messages::delete_message));

    // Notification routes
    let notification_routes = Router::new()
        .route("/", post(notifications::create_notification))
        .route("/", get(notifications::list_notifications))
        .route("/:id", get(notifications::get_notification))
        .route("/:id", put(notifications::update_notification))
        .route("/:id", delete(notifications::delete_notification));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/clinics", clinic_routes)
        .nest("/plans", plan_routes)
        .nest("/devices", device_routes)
        .nest("/messages", message_routes)
        .nest("/notifications", notification_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
