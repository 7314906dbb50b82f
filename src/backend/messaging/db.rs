//! PostgreSQL message store.
//!
//! Messages live in the `messages` table. The `seq` column is a plain
//! bigserial used only to break `created_at` ties in insertion order.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::backend::error::StoreError;
use crate::backend::messaging::store::{Message, MessageStore};

pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn save_message(
        &self,
        chat_id: &str,
        sender: &str,
        content: &str,
    ) -> Result<Message, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO messages (id, chat_id, sender, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(chat_id)
        .bind(sender)
        .bind(content)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Message {
            id,
            chat_id: chat_id.to_string(),
            sender: sender.to_string(),
            content: content.to_string(),
            created_at: now,
        })
    }

    async fn find_messages_for_chat(&self, chat_id: &str) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, chat_id, sender, content, created_at
            FROM messages
            WHERE chat_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Message {
                id: row.get("id"),
                chat_id: row.get("chat_id"),
                sender: row.get("sender"),
                content: row.get("content"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
