//! In-memory message store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::backend::error::StoreError;
use crate::backend::messaging::store::{Message, MessageStore};

#[derive(Default)]
pub struct MemoryMessageStore {
    messages: Mutex<Vec<Message>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn save_message(
        &self,
        chat_id: &str,
        sender: &str,
        content: &str,
    ) -> Result<Message, StoreError> {
        let message = Message {
            id: Uuid::new_v4(),
            chat_id: chat_id.to_string(),
            sender: sender.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn find_messages_for_chat(&self, chat_id: &str) -> Result<Vec<Message>, StoreError> {
        let messages = self.messages.lock().unwrap();
        let mut result: Vec<Message> = messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        result.sort_by_key(|m| m.created_at);
        Ok(result)
    }
}
