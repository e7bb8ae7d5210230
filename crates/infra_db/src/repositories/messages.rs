//! Message repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for conversation messages
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a message by id, returning `None` when absent
    pub async fn find_by_id(&self, message_id: Uuid) -> Result<Option<MessageRow>, DatabaseError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT message_id, body, conversation_id, user_id, read,
                   created_at, updated_at
            FROM messages
            WHERE message_id = $1
            "#,
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Returns all messages, newest first
    pub async fn list(&self) -> Result<Vec<MessageRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT message_id, body, conversation_id, user_id, read,
                   created_at, updated_at
            FROM messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Returns the messages of one conversation, oldest first
    pub async fn list_by_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<MessageRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT message_id, body, conversation_id, user_id, read,
                   created_at, updated_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a new message row
    pub async fn insert(&self, message: NewMessage) -> Result<MessageRow, DatabaseError> {
        let message_id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (
                message_id, body, conversation_id, user_id, read,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING message_id, body, conversation_id, user_id, read,
                      created_at, updated_at
            "#,
        )
        .bind(message_id)
        .bind(&message.body)
        .bind(message.conversation_id)
        .bind(message.user_id)
        .bind(message.read)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Applies a partial update; NotFound when the id does not exist
    pub async fn update(
        &self,
        message_id: Uuid,
        changes: MessageChanges,
    ) -> Result<MessageRow, DatabaseError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            UPDATE messages
            SET body       = COALESCE($2, body),
                read       = COALESCE($3, read),
                updated_at = $4
            WHERE message_id = $1
            RETURNING message_id, body, conversation_id, user_id, read,
                      created_at, updated_at
            "#,
        )
        .bind(message_id)
        .bind(&changes.body)
        .bind(changes.read)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Message", message_id))?;

        Ok(row)
    }

    /// Deletes a message by id; NotFound when no row matched
    pub async fn delete(&self, message_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM messages WHERE message_id = $1")
            .bind(message_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Message", message_id));
        }
        Ok(())
    }
}

/// Database row representation of a message
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRow {
    pub message_id: Uuid,
    pub body: String,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a message
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub body: String,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub read: bool,
}

/// Partial update for a message; only body and read flag are mutable
#[derive(Debug, Clone, Default)]
pub struct MessageChanges {
    pub body: Option<String>,
    pub read: Option<bool>,
}
