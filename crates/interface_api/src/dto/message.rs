//! Message DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use infra_db::repositories::{MessageChanges, MessageRow, NewMessage};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(min = 1))]
    pub body: String,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub read: bool,
}

impl From<CreateMessageRequest> for NewMessage {
    fn from(request: CreateMessageRequest) -> Self {
        Self {
            body: request.body,
            conversation_id: request.conversation_id,
            user_id: request.user_id,
            read: request.read,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMessageRequest {
    #[validate(length(min = 1))]
    pub body: Option<String>,
    pub read: Option<bool>,
}

impl From<UpdateMessageRequest> for MessageChanges {
    fn from(request: UpdateMessageRequest) -> Self {
        Self {
            body: request.body,
            read: request.read,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub body: String,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MessageRow> for MessageResponse {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.message_id,
            body: row.body,
            conversation_id: row.conversation_id,
            user_id: row.user_id,
            read: row.read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
