//! Clinic repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for clinic rows
#[derive(Debug, Clone)]
pub struct ClinicRepository {
    pool: PgPool,
}

impl ClinicRepository {
    /// Creates a new ClinicRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a clinic by id, returning `None` when absent
    pub async fn find_by_id(&self, clinic_id: Uuid) -> Result<Option<ClinicRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ClinicRow>(
            r#"
            SELECT clinic_id, name, address, phone, email, company_id,
                   created_at, updated_at
            FROM clinics
            WHERE clinic_id = $1
            "#,
        )
        .bind(clinic_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Returns all clinics, newest first
    pub async fn list(&self) -> Result<Vec<ClinicRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ClinicRow>(
            r#"
            SELECT clinic_id, name, address, phone, email, company_id,
                   created_at, updated_at
            FROM clinics
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a new clinic row
    pub async fn insert(&self, clinic: NewClinic) -> Result<ClinicRow, DatabaseError> {
        let clinic_id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<_, ClinicRow>(
            r#"
            INSERT INTO clinics (
                clinic_id, name, address, phone, email, company_id,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING clinic_id, name, address, phone, email, company_id,
                      created_at, updated_at
            "#,
        )
        .bind(clinic_id)
        .bind(&clinic.name)
        .bind(&clinic.address)
        .bind(&clinic.phone)
        .bind(&clinic.email)
        .bind(clinic.company_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Applies a partial update; NotFound when the id does not exist
    pub async fn update(
        &self,
        clinic_id: Uuid,
        changes: ClinicChanges,
    ) -> Result<ClinicRow, DatabaseError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, ClinicRow>(
            r#"
            UPDATE clinics
            SET name       = COALESCE($2, name),
                address    = COALESCE($3, address),
                phone      = COALESCE($4, phone),
                email      = COALESCE($5, email),
                company_id = COALESCE($6, company_id),
                updated_at = $7
            WHERE clinic_id = $1
            RETURNING clinic_id, name, address, phone, email, company_id,
                      created_at, updated_at
            "#,
        )
        .bind(clinic_id)
        .bind(&changes.name)
        .bind(&changes.address)
        .bind(&changes.phone)
        .bind(&changes.email)
        .bind(changes.company_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Clinic", clinic_id))?;

        Ok(row)
    }

    /// Deletes a clinic by id; NotFound when no row matched
    pub async fn delete(&self, clinic_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM clinics WHERE clinic_id = $1")
            .bind(clinic_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Clinic", clinic_id));
        }
        Ok(())
    }
}

/// Database row representation of a clinic
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClinicRow {
    pub clinic_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a clinic
#[derive(Debug, Clone)]
pub struct NewClinic {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company_id: Option<Uuid>,
}

/// Partial update for a clinic; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ClinicChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company_id: Option<Uuid>,
}
