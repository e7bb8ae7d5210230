//! Plan repository implementation
//!
//! Persists subscription plan records. The `remote_id` column carries the
//! billing provider's identifier for the plan; it is written exactly once on
//! insert and never updated here. Sequencing against the provider happens
//! above this layer, the repository only moves rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for plan rows
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    /// Creates a new PlanRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a plan by id, returning `None` when absent
    pub async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT plan_id, remote_id, name, amount, currency, billing_interval,
                   description, created_at, updated_at
            FROM plans
            WHERE plan_id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Returns all plans, newest first
    pub async fn list(&self) -> Result<Vec<PlanRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT plan_id, remote_id, name, amount, currency, billing_interval,
                   description, created_at, updated_at
            FROM plans
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a new plan row
    pub async fn insert(&self, plan: NewPlanRecord) -> Result<PlanRow, DatabaseError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            INSERT INTO plans (
                plan_id, remote_id, name, amount, currency, billing_interval,
                description, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING plan_id, remote_id, name, amount, currency, billing_interval,
                      description, created_at, updated_at
            "#,
        )
        .bind(plan.plan_id)
        .bind(&plan.remote_id)
        .bind(&plan.name)
        .bind(plan.amount)
        .bind(&plan.currency)
        .bind(&plan.billing_interval)
        .bind(&plan.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Applies a partial update to an existing plan
    ///
    /// Unset fields keep their stored values. Returns NotFound when the id
    /// does not exist.
    pub async fn update(
        &self,
        plan_id: Uuid,
        changes: PlanChanges,
    ) -> Result<PlanRow, DatabaseError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            UPDATE plans
            SET name             = COALESCE($2, name),
                amount           = COALESCE($3, amount),
                currency         = COALESCE($4, currency),
                billing_interval = COALESCE($5, billing_interval),
                description      = COALESCE($6, description),
                updated_at       = $7
            WHERE plan_id = $1
            RETURNING plan_id, remote_id, name, amount, currency, billing_interval,
                      description, created_at, updated_at
            "#,
        )
        .bind(plan_id)
        .bind(&changes.name)
        .bind(changes.amount)
        .bind(&changes.currency)
        .bind(&changes.billing_interval)
        .bind(&changes.description)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Plan", plan_id))?;

        Ok(row)
    }

    /// Deletes a plan by id; NotFound when no row matched
    pub async fn delete(&self, plan_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM plans WHERE plan_id = $1")
            .bind(plan_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Plan", plan_id));
        }
        Ok(())
    }
}

/// Database row representation of a plan
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRow {
    pub plan_id: Uuid,
    pub remote_id: Option<String>,
    pub name: String,
    pub amount: Decimal,
    pub currency: String,
    pub billing_interval: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a plan
#[derive(Debug, Clone)]
pub struct NewPlanRecord {
    pub plan_id: Uuid,
    pub remote_id: Option<String>,
    pub name: String,
    pub amount: Decimal,
    pub currency: String,
    pub billing_interval: String,
    pub description: Option<String>,
}

/// Partial update for a plan; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct PlanChanges {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub billing_interval: Option<String>,
    pub description: Option<String>,
}
