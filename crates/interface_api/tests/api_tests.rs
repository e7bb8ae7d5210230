//! Router-level tests
//!
//! These drive the full middleware/handler stack through `tower::oneshot`
//! with an in-memory plan store and a scripted billing provider. The database
//! pool is created lazily and never connected; only plan and health routes
//! are exercised here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PlanId, PortError,
};
use domain_billing::{
    BillingProviderPort, InMemoryReconciliationQueue, NewPlan, Plan, PlanPatch, PlanStore,
    PlanSyncManager, ProviderError, RemotePlan,
};
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::create_router;

const JWT_SECRET: &str = "test-secret";

/// Billing provider that either mints sequential ids or rejects everything
struct TestProvider {
    decline: Option<String>,
    counter: Mutex<u64>,
}

impl TestProvider {
    fn accepting() -> Self {
        Self {
            decline: None,
            counter: Mutex::new(0),
        }
    }

    fn declining(message: &str) -> Self {
        Self {
            decline: Some(message.to_string()),
            counter: Mutex::new(0),
        }
    }

    fn check(&self) -> Result<(), ProviderError> {
        match &self.decline {
            Some(message) => Err(ProviderError::new(message.clone())),
            None => Ok(()),
        }
    }
}

impl DomainPort for TestProvider {}

#[async_trait]
impl HealthCheckable for TestProvider {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "test-provider".to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: None,
            checked_at: chrono::Utc::now(),
        }
    }
}

#[async_trait]
impl BillingProviderPort for TestProvider {
    async fn create_plan(&self, _plan: &NewPlan) -> Result<RemotePlan, ProviderError> {
        self.check()?;
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        Ok(RemotePlan {
            id: format!("plan_{}", counter),
        })
    }

    async fn update_plan(
        &self,
        remote_id: &str,
        _patch: &PlanPatch,
    ) -> Result<RemotePlan, ProviderError> {
        self.check()?;
        Ok(RemotePlan {
            id: remote_id.to_string(),
        })
    }

    async fn delete_plan(&self, _remote_id: &str) -> Result<(), ProviderError> {
        self.check()
    }
}

/// Plain in-memory plan store
#[derive(Default)]
struct TestStore {
    plans: Mutex<HashMap<PlanId, Plan>>,
}

impl TestStore {
    fn count(&self) -> usize {
        self.plans.lock().unwrap().len()
    }
}

impl DomainPort for TestStore {}

#[async_trait]
impl PlanStore for TestStore {
    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, PortError> {
        Ok(self.plans.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Plan>, PortError> {
        Ok(self.plans.lock().unwrap().values().cloned().collect())
    }

    async fn insert(&self, plan: NewPlan, remote_id: String) -> Result<Plan, PortError> {
        let plan = Plan::from_new(plan, remote_id);
        self.plans.lock().unwrap().insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn update(&self, id: PlanId, patch: PlanPatch) -> Result<Plan, PortError> {
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Plan", id))?;
        plan.apply(&patch);
        Ok(plan.clone())
    }

    async fn delete(&self, id: PlanId) -> Result<(), PortError> {
        self.plans
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Plan", id))
    }
}

fn test_config() -> ApiConfig {
    ApiConfig {
        jwt_secret: JWT_SECRET.to_string(),
        ..ApiConfig::default()
    }
}

fn app_with(provider: TestProvider) -> (Router, Arc<TestStore>) {
    let store = Arc::new(TestStore::default());
    let manager = Arc::new(PlanSyncManager::new(
        Arc::new(provider),
        store.clone(),
        Arc::new(InMemoryReconciliationQueue::new()),
    ));
    // Lazy pool: valid handle, no connection is ever made by plan routes.
    let pool = sqlx::PgPool::connect_lazy("postgres://localhost/clinic_test")
        .expect("lazy pool");
    (create_router(pool, manager, test_config()), store)
}

fn bearer(roles: &[&str]) -> String {
    let token = create_token(
        "user-1",
        roles.iter().map(|r| r.to_string()).collect(),
        JWT_SECRET,
        3600,
    )
    .expect("token");
    format!("Bearer {}", token)
}

fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = app_with(TestProvider::accepting());
    let response = app
        .oneshot(json_request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn plan_routes_require_a_token() {
    let (app, _) = app_with(TestProvider::accepting());
    let response = app
        .oneshot(json_request("GET", "/api/v1/plans", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn plan_routes_are_gated_on_the_company_role() {
    let (app, _) = app_with(TestProvider::accepting());
    let response = app
        .oneshot(json_request(
            "GET",
            "/api/v1/plans",
            Some(&bearer(&["staff"])),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("You don't have permission"));
    assert_eq!(body["data"], json!(null));
}

#[tokio::test]
async fn create_plan_returns_the_remote_id_in_the_envelope() {
    let (app, store) = app_with(TestProvider::accepting());
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/plans",
            Some(&bearer(&["company"])),
            Some(json!({
                "name": "Basic",
                "amount": "10.00",
                "currency": "usd",
                "interval": "month"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Plan saved successfully"));
    assert_eq!(body["data"]["remote_id"], json!("plan_1"));
    assert_eq!(store.count(), 1);
}

#[tokio::test]
async fn declined_create_is_422_with_the_provider_message() {
    let (app, store) = app_with(TestProvider::declining("Your card was declined"));
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/plans",
            Some(&bearer(&["company"])),
            Some(json!({
                "name": "Basic",
                "amount": "10.00",
                "currency": "usd",
                "interval": "month"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Your card was declined"));
    assert_eq!(body["data"], json!(null));
    // The rejected create left no orphaned local record.
    assert_eq!(store.count(), 0);
}

#[tokio::test]
async fn invalid_plan_body_is_a_validation_error() {
    let (app, store) = app_with(TestProvider::accepting());
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/plans",
            Some(&bearer(&["company"])),
            Some(json!({
                "name": "",
                "amount": "10.00",
                "currency": "usd",
                "interval": "month"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], json!("validation_error"));
    assert_eq!(store.count(), 0);
}

#[tokio::test]
async fn missing_plan_is_a_404_envelope() {
    let (app, _) = app_with(TestProvider::accepting());
    let uri = format!("/api/v1/plans/{}", uuid::Uuid::new_v4());
    let response = app
        .oneshot(json_request("GET", &uri, Some(&bearer(&["company"])), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Plan not found"));
}

#[tokio::test]
async fn update_missing_plan_makes_no_remote_call() {
    // A declining provider would turn any remote call into a 422; a 404 here
    // proves the existence check ran first.
    let (app, _) = app_with(TestProvider::declining("should never be reached"));
    let uri = format!("/api/v1/plans/{}", uuid::Uuid::new_v4());
    let response = app
        .oneshot(json_request(
            "PUT",
            &uri,
            Some(&bearer(&["company"])),
            Some(json!({ "name": "Premium" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_roundtrip_confirms_the_id() {
    let (app, store) = app_with(TestProvider::accepting());

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/plans",
            Some(&bearer(&["company"])),
            Some(json!({
                "name": "Basic",
                "amount": "10.00",
                "currency": "usd",
                "interval": "month"
            })),
        ))
        .await
        .unwrap();
    let created = body_json(created).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/v1/plans/{}", id),
            Some(&bearer(&["company"])),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!(id));
    assert_eq!(store.count(), 0);
}
