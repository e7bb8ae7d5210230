//! Notification repository implementation
//!
//! Notifications are addressed from one user to another; `status` is 0 for
//! unread and 1 for read, and `employee_request` links the notification to a
//! pending staff request when one exists.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for notification rows
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a notification by id, returning `None` when absent
    pub async fn find_by_id(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<NotificationRow>, DatabaseError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT notification_id, content, status, receiver, sender, kind,
                   employee_request, created_at, updated_at
            FROM notifications
            WHERE notification_id = $1
            "#,
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Returns all notifications, newest first
    pub async fn list(&self) -> Result<Vec<NotificationRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT notification_id, content, status, receiver, sender, kind,
                   employee_request, created_at, updated_at
            FROM notifications
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Returns the notifications addressed to one user, newest first
    pub async fn list_by_receiver(
        &self,
        receiver: Uuid,
    ) -> Result<Vec<NotificationRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT notification_id, content, status, receiver, sender, kind,
                   employee_request, created_at, updated_at
            FROM notifications
            WHERE receiver = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(receiver)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a new notification row
    pub async fn insert(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationRow, DatabaseError> {
        let notification_id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (
                notification_id, content, status, receiver, sender, kind,
                employee_request, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING notification_id, content, status, receiver, sender, kind,
                      employee_request, created_at, updated_at
            "#,
        )
        .bind(notification_id)
        .bind(&notification.content)
        .bind(notification.status)
        .bind(notification.receiver)
        .bind(notification.sender)
        .bind(&notification.kind)
        .bind(notification.employee_request)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Applies a partial update; NotFound when the id does not exist
    pub async fn update(
        &self,
        notification_id: Uuid,
        changes: NotificationChanges,
    ) -> Result<NotificationRow, DatabaseError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications
            SET content    = COALESCE($2, content),
                status     = COALESCE($3, status),
                kind       = COALESCE($4, kind),
                updated_at = $5
            WHERE notification_id = $1
            RETURNING notification_id, content, status, receiver, sender, kind,
                      employee_request, created_at, updated_at
            "#,
        )
        .bind(notification_id)
        .bind(&changes.content)
        .bind(changes.status)
        .bind(&changes.kind)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Notification", notification_id))?;

        Ok(row)
    }

    /// Deletes a notification by id; NotFound when no row matched
    pub async fn delete(&self, notification_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM notifications WHERE notification_id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Notification", notification_id));
        }
        Ok(())
    }
}

/// Database row representation of a notification
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationRow {
    pub notification_id: Uuid,
    pub content: String,
    pub status: i32,
    pub receiver: Uuid,
    pub sender: Uuid,
    pub kind: Option<String>,
    pub employee_request: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a notification
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub content: String,
    pub status: i32,
    pub receiver: Uuid,
    pub sender: Uuid,
    pub kind: Option<String>,
    pub employee_request: Option<i32>,
}

/// Partial update for a notification; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct NotificationChanges {
    pub content: Option<String>,
    pub status: Option<i32>,
    pub kind: Option<String>,
}
