//! The `Message` record and the `MessageStore` seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::StoreError;

/// A stored chat message. Immutable once created.
///
/// Serializes with camelCase field names; this is both the REST history
/// shape and the `data` payload of realtime CHAT envelopes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    /// External chat identifier, as used on the realtime protocol.
    pub chat_id: String,
    /// Token subject of the sender; not a user-record foreign key.
    pub sender: String,
    pub content: String,
    /// Assigned by the store at persist time.
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a message, assigning id and server-side timestamp.
    async fn save_message(
        &self,
        chat_id: &str,
        sender: &str,
        content: &str,
    ) -> Result<Message, StoreError>;

    /// All messages of a chat, ascending by creation time (ties in
    /// insertion order). Unknown chat ids yield an empty list.
    async fn find_messages_for_chat(&self, chat_id: &str) -> Result<Vec<Message>, StoreError>;
}
