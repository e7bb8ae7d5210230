//! Device repository implementation
//!
//! Tracker devices are keyed by a generated id but identified in the field by
//! their IMEI, which is unique across the fleet.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for device rows
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a device by id, returning `None` when absent
    pub async fn find_by_id(&self, device_id: Uuid) -> Result<Option<DeviceRow>, DatabaseError> {
        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT device_id, imei, name, user_id, battery, phone, mode,
                   company_id, device_uuid, created_at, updated_at
            FROM devices
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Fetches a device by IMEI
    pub async fn find_by_imei(&self, imei: &str) -> Result<Option<DeviceRow>, DatabaseError> {
        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT device_id, imei, name, user_id, battery, phone, mode,
                   company_id, device_uuid, created_at, updated_at
            FROM devices
            WHERE imei = $1
            "#,
        )
        .bind(imei)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Returns all devices, newest first
    pub async fn list(&self) -> Result<Vec<DeviceRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT device_id, imei, name, user_id, battery, phone, mode,
                   company_id, device_uuid, created_at, updated_at
            FROM devices
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a new device row
    pub async fn insert(&self, device: NewDevice) -> Result<DeviceRow, DatabaseError> {
        let device_id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            INSERT INTO devices (
                device_id, imei, name, user_id, battery, phone, mode,
                company_id, device_uuid, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING device_id, imei, name, user_id, battery, phone, mode,
                      company_id, device_uuid, created_at, updated_at
            "#,
        )
        .bind(device_id)
        .bind(&device.imei)
        .bind(&device.name)
        .bind(device.user_id)
        .bind(device.battery)
        .bind(&device.phone)
        .bind(&device.mode)
        .bind(device.company_id)
        .bind(&device.device_uuid)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Applies a partial update; NotFound when the id does not exist
    pub async fn update(
        &self,
        device_id: Uuid,
        changes: DeviceChanges,
    ) -> Result<DeviceRow, DatabaseError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            UPDATE devices
            SET imei       = COALESCE($2, imei),
                name       = COALESCE($3, name),
                user_id    = COALESCE($4, user_id),
                battery    = COALESCE($5, battery),
                phone      = COALESCE($6, phone),
                mode       = COALESCE($7, mode),
                company_id = COALESCE($8, company_id),
                updated_at = $9
            WHERE device_id = $1
            RETURNING device_id, imei, name, user_id, battery, phone, mode,
                      company_id, device_uuid, created_at, updated_at
            "#,
        )
        .bind(device_id)
        .bind(&changes.imei)
        .bind(&changes.name)
        .bind(changes.user_id)
        .bind(changes.battery)
        .bind(&changes.phone)
        .bind(&changes.mode)
        .bind(changes.company_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Device", device_id))?;

        Ok(row)
    }

    /// Deletes a device by id; NotFound when no row matched
    pub async fn delete(&self, device_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM devices WHERE device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Device", device_id));
        }
        Ok(())
    }
}

/// Database row representation of a device
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceRow {
    pub device_id: Uuid,
    pub imei: String,
    pub name: Option<String>,
    pub user_id: Option<Uuid>,
    pub battery: Option<i32>,
    pub phone: Option<String>,
    pub mode: Option<String>,
    pub company_id: Option<Uuid>,
    pub device_uuid: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a device
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub imei: String,
    pub name: Option<String>,
    pub user_id: Option<Uuid>,
    pub battery: Option<i32>,
    pub phone: Option<String>,
    pub mode: Option<String>,
    pub company_id: Option<Uuid>,
    pub device_uuid: Option<String>,
}

/// Partial update for a device; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct DeviceChanges {
    pub imei: Option<String>,
    pub name: Option<String>,
    pub user_id: Option<Uuid>,
    pub battery: Option<i32>,
    pub phone: Option<String>,
    pub mode: Option<String>,
    pub company_id: Option<Uuid>,
}
