//! In-memory chat store.
//!
//! Used by the test suite and by deployments running without a database.
//! A single mutex around the whole map makes every operation, including
//! the direct-chat check-then-act, atomic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::backend::chat::store::ChatStore;
use crate::backend::chat::types::{Chat, ChatParticipant, ChatType};
use crate::backend::error::StoreError;

#[derive(Default)]
pub struct MemoryChatStore {
    chats: Mutex<HashMap<Uuid, Chat>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_direct_between(chat: &Chat, user1: Uuid, user2: Uuid) -> bool {
    chat.chat_type == ChatType::Direct
        && chat.has_participant(user1)
        && chat.has_participant(user2)
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn find_direct_chat_between(
        &self,
        user1: Uuid,
        user2: Uuid,
    ) -> Result<Option<Chat>, StoreError> {
        let chats = self.chats.lock().unwrap();
        Ok(chats
            .values()
            .find(|c| is_direct_between(c, user1, user2))
            .cloned())
    }

    async fn save_chat_with_participants(&self, chat: Chat) -> Result<Chat, StoreError> {
        let mut chats = self.chats.lock().unwrap();
        if chat.chat_type == ChatType::Direct {
            // Mirrors the database's unique constraint over the pair key.
            let duplicate = chats.values().any(|c| {
                c.chat_type == ChatType::Direct
                    && chat.participants.iter().all(|p| c.has_participant(p.user_id))
            });
            if duplicate {
                return Err(StoreError::DuplicateDirectChat);
            }
        }
        chats.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn find_chat_by_id(&self, chat_id: Uuid) -> Result<Option<Chat>, StoreError> {
        Ok(self.chats.lock().unwrap().get(&chat_id).cloned())
    }

    async fn find_participant(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ChatParticipant>, StoreError> {
        let chats = self.chats.lock().unwrap();
        Ok(chats.get(&chat_id).and_then(|c| {
            c.participants
                .iter()
                .find(|p| p.user_id == user_id)
                .cloned()
        }))
    }

    async fn exists_participant(&self, chat_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let chats = self.chats.lock().unwrap();
        Ok(chats
            .get(&chat_id)
            .map(|c| c.has_participant(user_id))
            .unwrap_or(false))
    }

    async fn save_participant(&self, participant: ChatParticipant) -> Result<(), StoreError> {
        let mut chats = self.chats.lock().unwrap();
        if let Some(chat) = chats.get_mut(&participant.chat_id) {
            chat.participants.push(participant);
        }
        Ok(())
    }

    async fn delete_participant(&self, chat_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        let mut chats = self.chats.lock().unwrap();
        if let Some(chat) = chats.get_mut(&chat_id) {
            chat.participants.retain(|p| p.user_id != user_id);
        }
        Ok(())
    }

    async fn find_chats_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, StoreError> {
        let chats = self.chats.lock().unwrap();
        let mut result: Vec<Chat> = chats
            .values()
            .filter(|c| c.has_participant(user_id))
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; sort for determinism.
        result.sort_by_key(|c| (c.created_at, c.id));
        Ok(result)
    }
}
