//! Chat domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatType {
    Direct,
    Group,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "DIRECT",
            Self::Group => "GROUP",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DIRECT" => Some(Self::Direct),
            "GROUP" => Some(Self::Group),
            _ => None,
        }
    }
}

/// Role of a participant within a chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatRole {
    Admin,
    Member,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Self::Admin),
            "MEMBER" => Some(Self::Member),
            _ => None,
        }
    }
}

/// A user's membership record in a chat. Unique per (chat_id, user_id).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatParticipant {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub role: ChatRole,
}

/// A conversation container with its participants.
#[derive(Clone, Debug)]
pub struct Chat {
    pub id: Uuid,
    pub chat_type: ChatType,
    /// Display name; always `None` for direct chats.
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub participants: Vec<ChatParticipant>,
}

impl Chat {
    /// A new direct chat between two users, both plain members.
    pub fn direct(user1: Uuid, user2: Uuid) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            chat_type: ChatType::Direct,
            name: None,
            created_at: Utc::now(),
            participants: vec![
                ChatParticipant {
                    chat_id: id,
                    user_id: user1,
                    role: ChatRole::Member,
                },
                ChatParticipant {
                    chat_id: id,
                    user_id: user2,
                    role: ChatRole::Member,
                },
            ],
        }
    }

    /// A new group chat with its creator as admin.
    pub fn group(name: &str, creator_id: Uuid) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            chat_type: ChatType::Group,
            name: Some(name.to_string()),
            created_at: Utc::now(),
            participants: vec![ChatParticipant {
                chat_id: id,
                user_id: creator_id,
                role: ChatRole::Admin,
            }],
        }
    }

    /// Canonical key for the unordered user pair of a direct chat.
    ///
    /// Ordering the pair before building the key is what lets a single
    /// UNIQUE column enforce "one direct chat per pair" regardless of
    /// argument order.
    pub fn direct_key(user1: Uuid, user2: Uuid) -> String {
        let (lo, hi) = if user1 <= user2 {
            (user1, user2)
        } else {
            (user2, user1)
        };
        format!("{lo}:{hi}")
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }
}
