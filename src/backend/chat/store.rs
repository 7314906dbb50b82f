//! The `ChatStore` seam.
//!
//! The membership engine talks to durable storage exclusively through this
//! trait. `save_chat_with_participants` is the one atomic unit: either the
//! chat and all its initial participants exist afterwards, or none do, and
//! a direct-chat pair collision must surface as
//! [`StoreError::DuplicateDirectChat`] rather than a generic failure.

use async_trait::async_trait;
use uuid::Uuid;

use crate::backend::chat::types::{Chat, ChatParticipant};
use crate::backend::error::StoreError;

#[async_trait]
pub trait ChatStore: Send + Sync {
    /// The direct chat containing exactly this pair of users, if any.
    async fn find_direct_chat_between(
        &self,
        user1: Uuid,
        user2: Uuid,
    ) -> Result<Option<Chat>, StoreError>;

    /// Persist a chat and its initial participants atomically.
    async fn save_chat_with_participants(&self, chat: Chat) -> Result<Chat, StoreError>;

    /// A chat by id, with participants loaded.
    async fn find_chat_by_id(&self, chat_id: Uuid) -> Result<Option<Chat>, StoreError>;

    async fn find_participant(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ChatParticipant>, StoreError>;

    async fn exists_participant(&self, chat_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;

    async fn save_participant(&self, participant: ChatParticipant) -> Result<(), StoreError>;

    async fn delete_participant(&self, chat_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;

    /// All chats the user currently participates in, in a deterministic
    /// store-defined order.
    async fn find_chats_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, StoreError>;
}
