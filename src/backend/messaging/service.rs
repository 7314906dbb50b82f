//! Message store adapter.
//!
//! Thin layer between the protocol handlers and the `MessageStore`
//! implementation. Append never validates that the chat id refers to an
//! existing chat, and history for an unknown chat is simply empty.

use std::sync::Arc;

use crate::backend::error::ApiError;
use crate::backend::messaging::store::{Message, MessageStore};

#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Persist a message and return the stored record, with the id and
    /// timestamp the store assigned.
    pub async fn append(
        &self,
        chat_id: &str,
        sender: &str,
        content: &str,
    ) -> Result<Message, ApiError> {
        let message = self.store.save_message(chat_id, sender, content).await?;
        tracing::debug!(
            "[Messaging] stored message {} in chat {}",
            message.id,
            message.chat_id
        );
        Ok(message)
    }

    /// Ordered history of a chat, oldest first.
    pub async fn history(&self, chat_id: &str) -> Result<Vec<Message>, ApiError> {
        Ok(self.store.find_messages_for_chat(chat_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::messaging::memory::MemoryMessageStore;
    use pretty_assertions::assert_eq;

    fn service() -> MessageService {
        MessageService::new(Arc::new(MemoryMessageStore::new()))
    }

    #[tokio::test]
    async fn test_append_assigns_id_and_timestamp() {
        let svc = service();
        let stored = svc.append("room-1", "alice", "Hello!").await.unwrap();

        assert_eq!(stored.chat_id, "room-1");
        assert_eq!(stored.sender, "alice");
        assert_eq!(stored.content, "Hello!");
    }

    #[tokio::test]
    async fn test_history_preserves_append_order() {
        let svc = service();
        svc.append("room-1", "alice", "first").await.unwrap();
        svc.append("room-1", "bob", "second").await.unwrap();
        svc.append("room-1", "alice", "third").await.unwrap();

        let history = svc.history("room-1").await.unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_history_is_scoped_to_chat() {
        let svc = service();
        svc.append("room-1", "alice", "here").await.unwrap();
        svc.append("room-2", "bob", "elsewhere").await.unwrap();

        let history = svc.history("room-1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "here");
    }

    #[tokio::test]
    async fn test_history_for_unknown_chat_is_empty() {
        let svc = service();
        let history = svc.history("never-seen").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_messages_get_distinct_ids() {
        let svc = service();
        let m1 = svc.append("room-1", "alice", "a").await.unwrap();
        let m2 = svc.append("room-1", "alice", "b").await.unwrap();
        assert_ne!(m1.id, m2.id);
    }
}
