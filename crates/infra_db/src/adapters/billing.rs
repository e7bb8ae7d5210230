//! PostgreSQL plan store adapter
//!
//! Implements the billing domain's [`PlanStore`] port on top of
//! [`PlanRepository`]. The adapter owns the translation in both directions:
//! repository rows become domain `Plan` values, and `DatabaseError` is mapped
//! into the `PortError` taxonomy so the domain never sees sqlx types.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PlanId, PortError,
};
use domain_billing::{BillingInterval, NewPlan, Plan, PlanPatch, PlanStore};

use crate::error::DatabaseError;
use crate::repositories::plans::{NewPlanRecord, PlanChanges, PlanRepository, PlanRow};

/// PostgreSQL-backed implementation of the `PlanStore` port
#[derive(Debug, Clone)]
pub struct PostgresPlanStore {
    repository: PlanRepository,
    pool: PgPool,
}

impl PostgresPlanStore {
    /// Creates a new PostgreSQL plan store
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PlanRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &PlanRepository {
        &self.repository
    }
}

impl DomainPort for PostgresPlanStore {}

#[async_trait]
impl HealthCheckable for PostgresPlanStore {
    /// Checks database connectivity with a trivial query
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-plan-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-plan-store".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl PlanStore for PostgresPlanStore {
    #[instrument(skip(self), fields(plan_id = %id))]
    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, PortError> {
        debug!("Fetching plan by id");
        let row = self
            .repository
            .find_by_id(*id.as_uuid())
            .await
            .map_err(PortError::from)?;
        row.map(row_to_plan).transpose()
    }

    async fn list(&self) -> Result<Vec<Plan>, PortError> {
        let rows = self.repository.list().await.map_err(PortError::from)?;
        rows.into_iter().map(row_to_plan).collect()
    }

    #[instrument(skip(self, plan), fields(plan_name = %plan.name))]
    async fn insert(&self, plan: NewPlan, remote_id: String) -> Result<Plan, PortError> {
        // Id generation matches the in-memory store: assigned here, not by
        // the database.
        let record = Plan::from_new(plan, remote_id);
        let row = self
            .repository
            .insert(NewPlanRecord {
                plan_id: *record.id.as_uuid(),
                remote_id: record.remote_id.clone(),
                name: record.name.clone(),
                amount: record.amount,
                currency: record.currency.clone(),
                billing_interval: record.interval.to_string(),
                description: record.description.clone(),
            })
            .await
            .map_err(PortError::from)?;
        row_to_plan(row)
    }

    #[instrument(skip(self, patch), fields(plan_id = %id))]
    async fn update(&self, id: PlanId, patch: PlanPatch) -> Result<Plan, PortError> {
        let row = self
            .repository
            .update(
                *id.as_uuid(),
                PlanChanges {
                    name: patch.name,
                    amount: patch.amount,
                    currency: patch.currency,
                    billing_interval: patch.interval.map(|i| i.to_string()),
                    description: patch.description,
                },
            )
            .await
            .map_err(|e| db_to_port_error(e, id))?;
        row_to_plan(row)
    }

    #[instrument(skip(self), fields(plan_id = %id))]
    async fn delete(&self, id: PlanId) -> Result<(), PortError> {
        self.repository
            .delete(*id.as_uuid())
            .await
            .map_err(|e| db_to_port_error(e, id))
    }
}

/// Maps a database error to a port error, keeping the typed id for NotFound
fn db_to_port_error(error: DatabaseError, id: PlanId) -> PortError {
    if error.is_not_found() {
        PortError::not_found("Plan", id)
    } else {
        error.into()
    }
}

/// Converts a plan row into the domain model
///
/// A row whose interval column holds an unknown value is corrupt; that is
/// reported as an internal error rather than a panic.
fn row_to_plan(row: PlanRow) -> Result<Plan, PortError> {
    let interval: BillingInterval = row
        .billing_interval
        .parse()
        .map_err(|_| {
            PortError::internal(format!(
                "plan {} has invalid interval '{}'",
                row.plan_id, row.billing_interval
            ))
        })?;

    Ok(Plan {
        id: PlanId::from_uuid(row.plan_id),
        remote_id: row.remote_id,
        name: row.name,
        amount: row.amount,
        currency: row.currency,
        interval,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
