//! Notification DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use infra_db::repositories::{NewNotification, NotificationChanges, NotificationRow};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub status: i32,
    pub receiver: Uuid,
    pub sender: Uuid,
    pub kind: Option<String>,
    pub employee_request: Option<i32>,
}

impl From<CreateNotificationRequest> for NewNotification {
    fn from(request: CreateNotificationRequest) -> Self {
        Self {
            content: request.content,
            status: request.status,
            receiver: request.receiver,
            sender: request.sender,
            kind: request.kind,
            employee_request: request.employee_request,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNotificationRequest {
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub status: Option<i32>,
    pub kind: Option<String>,
}

impl From<UpdateNotificationRequest> for NotificationChanges {
    fn from(request: UpdateNotificationRequest) -> Self {
        Self {
            content: request.content,
            status: request.status,
            kind: request.kind,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub content: String,
    pub status: i32,
    pub receiver: Uuid,
    pub sender: Uuid,
    pub kind: Option<String>,
    pub employee_request: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NotificationRow> for NotificationResponse {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.notification_id,
            content: row.content,
            status: row.status,
            receiver: row.receiver,
            sender: row.sender,
            kind: row.kind,
            employee_request: row.employee_request,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
