//! PostgreSQL chat store.
//!
//! Chats and participants live in the `chats` and `chat_participants`
//! tables created by the migrations. Direct-chat uniqueness is enforced by
//! the UNIQUE constraint on `chats.direct_key`; a violation during insert
//! is reported as `StoreError::DuplicateDirectChat` so the membership
//! engine can fall back to the already-created row.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::backend::chat::store::ChatStore;
use crate::backend::chat::types::{Chat, ChatParticipant, ChatRole, ChatType};
use crate::backend::error::StoreError;

pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the participant rows for a chat.
    async fn load_participants(&self, chat_id: Uuid) -> Result<Vec<ChatParticipant>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT chat_id, user_id, role
            FROM chat_participants
            WHERE chat_id = $1
            "#,
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ChatParticipant {
                chat_id: row.get("chat_id"),
                user_id: row.get("user_id"),
                role: ChatRole::from_str(row.get::<String, _>("role").as_str())
                    .unwrap_or(ChatRole::Member),
            })
            .collect())
    }

    async fn chat_from_row(&self, row: sqlx::postgres::PgRow) -> Result<Chat, StoreError> {
        let id: Uuid = row.get("id");
        let participants = self.load_participants(id).await?;
        Ok(Chat {
            id,
            chat_type: ChatType::from_str(row.get::<String, _>("chat_type").as_str())
                .unwrap_or(ChatType::Group),
            name: row.get("name"),
            created_at: row.get("created_at"),
            participants,
        })
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        StoreError::DuplicateDirectChat
    } else {
        e.into()
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn find_direct_chat_between(
        &self,
        user1: Uuid,
        user2: Uuid,
    ) -> Result<Option<Chat>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, chat_type, name, created_at
            FROM chats
            WHERE chat_type = 'DIRECT' AND direct_key = $1
            "#,
        )
        .bind(Chat::direct_key(user1, user2))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.chat_from_row(row).await?)),
            None => Ok(None),
        }
    }

    async fn save_chat_with_participants(&self, chat: Chat) -> Result<Chat, StoreError> {
        let direct_key = match chat.chat_type {
            ChatType::Direct => {
                // Exactly two participants by construction.
                Some(Chat::direct_key(
                    chat.participants[0].user_id,
                    chat.participants[1].user_id,
                ))
            }
            ChatType::Group => None,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO chats (id, chat_type, name, direct_key, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(chat.id)
        .bind(chat.chat_type.as_str())
        .bind(&chat.name)
        .bind(&direct_key)
        .bind(chat.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        for participant in &chat.participants {
            sqlx::query(
                r#"
                INSERT INTO chat_participants (chat_id, user_id, role)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(participant.chat_id)
            .bind(participant.user_id)
            .bind(participant.role.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_insert_error)?;
        }

        tx.commit().await?;

        Ok(chat)
    }

    async fn find_chat_by_id(&self, chat_id: Uuid) -> Result<Option<Chat>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, chat_type, name, created_at
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.chat_from_row(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_participant(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ChatParticipant>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT chat_id, user_id, role
            FROM chat_participants
            WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| ChatParticipant {
            chat_id: row.get("chat_id"),
            user_id: row.get("user_id"),
            role: ChatRole::from_str(row.get::<String, _>("role").as_str())
                .unwrap_or(ChatRole::Member),
        }))
    }

    async fn exists_participant(&self, chat_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM chat_participants
            WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn save_participant(&self, participant: ChatParticipant) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO chat_participants (chat_id, user_id, role)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(participant.chat_id)
        .bind(participant.user_id)
        .bind(participant.role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_participant(&self, chat_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM chat_participants
            WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_chats_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.chat_type, c.name, c.created_at
            FROM chats c
            INNER JOIN chat_participants cp ON c.id = cp.chat_id
            WHERE cp.user_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in rows {
            chats.push(self.chat_from_row(row).await?);
        }

        Ok(chats)
    }
}
