/**
 * Membership Engine
 *
 * Owns the chat-creation and participant-mutation rules:
 *
 * - a direct chat between two users is unique and immutable in membership
 * - a group chat starts with its creator as ADMIN; later additions are MEMBER
 * - a user appears at most once per chat
 *
 * No caller authorization happens here; that belongs to the HTTP layer.
 */

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::chat::store::ChatStore;
use crate::backend::chat::types::{Chat, ChatParticipant, ChatRole, ChatType};
use crate::backend::error::{ApiError, StoreError};

#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn ChatStore>,
}

impl ChatService {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    /// Get or create the direct chat between two users.
    ///
    /// Idempotent: the second call with the same pair returns the chat the
    /// first call created. Two concurrent first calls may both pass the
    /// lookup; the store's uniqueness constraint then rejects the loser,
    /// which re-reads and returns the winner's chat.
    pub async fn create_direct_chat(&self, user1: Uuid, user2: Uuid) -> Result<Chat, ApiError> {
        if user1 == user2 {
            return Err(ApiError::InvalidOperation(
                "Cannot create direct chat with a single user".to_string(),
            ));
        }

        if let Some(existing) = self.store.find_direct_chat_between(user1, user2).await? {
            return Ok(existing);
        }

        match self
            .store
            .save_chat_with_participants(Chat::direct(user1, user2))
            .await
        {
            Ok(chat) => {
                tracing::info!("[Chat] created direct chat {}", chat.id);
                Ok(chat)
            }
            Err(StoreError::DuplicateDirectChat) => {
                // Lost the creation race; the winner's chat is authoritative.
                tracing::debug!("[Chat] direct chat creation raced, returning existing chat");
                match self.store.find_direct_chat_between(user1, user2).await? {
                    Some(chat) => Ok(chat),
                    None => Err(StoreError::DuplicateDirectChat.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create a group chat with `creator_id` as its admin.
    pub async fn create_group_chat(&self, name: &str, creator_id: Uuid) -> Result<Chat, ApiError> {
        let chat = self
            .store
            .save_chat_with_participants(Chat::group(name, creator_id))
            .await?;
        tracing::info!("[Chat] created group chat {} ({name})", chat.id);
        Ok(chat)
    }

    /// Add a user to a group chat as MEMBER.
    pub async fn add_member(&self, chat_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let chat = self
            .store
            .find_chat_by_id(chat_id)
            .await?
            .ok_or(ApiError::ChatNotFound)?;

        if chat.chat_type != ChatType::Group {
            return Err(ApiError::InvalidOperation(
                "Cannot add users to direct chat".to_string(),
            ));
        }

        if self.store.exists_participant(chat_id, user_id).await? {
            return Err(ApiError::AlreadyMember);
        }

        self.store
            .save_participant(ChatParticipant {
                chat_id,
                user_id,
                role: ChatRole::Member,
            })
            .await?;

        tracing::info!("[Chat] user {user_id} added to chat {chat_id}");
        Ok(())
    }

    /// Remove a user from a group chat.
    ///
    /// Removing the last participant is allowed and leaves an empty chat.
    pub async fn remove_member(&self, chat_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let chat = self
            .store
            .find_chat_by_id(chat_id)
            .await?
            .ok_or(ApiError::ChatNotFound)?;

        if chat.chat_type != ChatType::Group {
            return Err(ApiError::InvalidOperation(
                "Cannot remove users from direct chat".to_string(),
            ));
        }

        if self.store.find_participant(chat_id, user_id).await?.is_none() {
            return Err(ApiError::NotAMember);
        }

        self.store.delete_participant(chat_id, user_id).await?;

        tracing::info!("[Chat] user {user_id} removed from chat {chat_id}");
        Ok(())
    }

    /// A chat by id, with its participants.
    pub async fn get_chat(&self, chat_id: Uuid) -> Result<Chat, ApiError> {
        self.store
            .find_chat_by_id(chat_id)
            .await?
            .ok_or(ApiError::ChatNotFound)
    }

    /// All chats the user participates in.
    pub async fn chats_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, ApiError> {
        Ok(self.store.find_chats_for_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::chat::memory::MemoryChatStore;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn service() -> ChatService {
        ChatService::new(Arc::new(MemoryChatStore::new()))
    }

    #[tokio::test]
    async fn test_create_direct_chat_is_idempotent() {
        let svc = service();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        let first = svc.create_direct_chat(alice, bob).await.unwrap();
        let second = svc.create_direct_chat(alice, bob).await.unwrap();
        let reversed = svc.create_direct_chat(bob, alice).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.id, reversed.id);
        assert_eq!(first.participants.len(), 2);
        assert!(first.participants.iter().all(|p| p.role == ChatRole::Member));
    }

    #[tokio::test]
    async fn test_create_direct_chat_with_self_rejected() {
        let svc = service();
        let alice = Uuid::new_v4();

        let result = svc.create_direct_chat(alice, alice).await;
        assert_matches!(result, Err(ApiError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn test_create_group_chat_creator_is_admin() {
        let svc = service();
        let creator = Uuid::new_v4();

        let chat = svc.create_group_chat("backend team", creator).await.unwrap();

        assert_eq!(chat.chat_type, ChatType::Group);
        assert_eq!(chat.participants.len(), 1);
        assert_eq!(chat.participants[0].user_id, creator);
        assert_eq!(chat.participants[0].role, ChatRole::Admin);
    }

    #[tokio::test]
    async fn test_add_member_to_direct_chat_rejected() {
        let svc = service();
        let chat = svc
            .create_direct_chat(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        let result = svc.add_member(chat.id, Uuid::new_v4()).await;
        assert_matches!(result, Err(ApiError::InvalidOperation(_)));

        // Membership unchanged afterwards.
        let reloaded = svc.get_chat(chat.id).await.unwrap();
        assert_eq!(reloaded.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_add_member_twice_rejected() {
        let svc = service();
        let chat = svc.create_group_chat("ops", Uuid::new_v4()).await.unwrap();
        let user = Uuid::new_v4();

        svc.add_member(chat.id, user).await.unwrap();
        let result = svc.add_member(chat.id, user).await;
        assert_matches!(result, Err(ApiError::AlreadyMember));

        // Exactly one new participant in total.
        let reloaded = svc.get_chat(chat.id).await.unwrap();
        assert_eq!(reloaded.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_add_member_unknown_chat() {
        let svc = service();
        let result = svc.add_member(Uuid::new_v4(), Uuid::new_v4()).await;
        assert_matches!(result, Err(ApiError::ChatNotFound));
    }

    #[tokio::test]
    async fn test_remove_member_not_in_chat() {
        let svc = service();
        let creator = Uuid::new_v4();
        let chat = svc.create_group_chat("ops", creator).await.unwrap();

        let result = svc.remove_member(chat.id, Uuid::new_v4()).await;
        assert_matches!(result, Err(ApiError::NotAMember));

        // Store untouched.
        let reloaded = svc.get_chat(chat.id).await.unwrap();
        assert_eq!(reloaded.participants.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_member_from_direct_chat_rejected() {
        let svc = service();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let chat = svc.create_direct_chat(alice, bob).await.unwrap();

        let result = svc.remove_member(chat.id, alice).await;
        assert_matches!(result, Err(ApiError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn test_remove_last_member_leaves_empty_chat() {
        let svc = service();
        let creator = Uuid::new_v4();
        let chat = svc.create_group_chat("ghost town", creator).await.unwrap();

        svc.remove_member(chat.id, creator).await.unwrap();

        let reloaded = svc.get_chat(chat.id).await.unwrap();
        assert!(reloaded.participants.is_empty());
    }

    #[tokio::test]
    async fn test_chats_for_user_lists_memberships() {
        let svc = service();
        let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let direct = svc.create_direct_chat(alice, bob).await.unwrap();
        let group = svc.create_group_chat("trio", alice).await.unwrap();
        svc.add_member(group.id, carol).await.unwrap();

        let alices = svc.chats_for_user(alice).await.unwrap();
        assert_eq!(alices.len(), 2);

        let carols = svc.chats_for_user(carol).await.unwrap();
        assert_eq!(carols.len(), 1);
        assert_eq!(carols[0].id, group.id);

        let bobs = svc.chats_for_user(bob).await.unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].id, direct.id);
    }

    /// Store double that hides an existing direct chat from the first
    /// lookup, simulating a lost check-then-act race.
    struct RacingStore {
        inner: MemoryChatStore,
        hide_first_lookup: AtomicBool,
    }

    #[async_trait]
    impl ChatStore for RacingStore {
        async fn find_direct_chat_between(
            &self,
            user1: Uuid,
            user2: Uuid,
        ) -> Result<Option<Chat>, StoreError> {
            if self.hide_first_lookup.swap(false, Ordering::SeqCst) {
                return Ok(None);
            }
            self.inner.find_direct_chat_between(user1, user2).await
        }

        async fn save_chat_with_participants(&self, chat: Chat) -> Result<Chat, StoreError> {
            self.inner.save_chat_with_participants(chat).await
        }

        async fn find_chat_by_id(&self, chat_id: Uuid) -> Result<Option<Chat>, StoreError> {
            self.inner.find_chat_by_id(chat_id).await
        }

        async fn find_participant(
            &self,
            chat_id: Uuid,
            user_id: Uuid,
        ) -> Result<Option<ChatParticipant>, StoreError> {
            self.inner.find_participant(chat_id, user_id).await
        }

        async fn exists_participant(
            &self,
            chat_id: Uuid,
            user_id: Uuid,
        ) -> Result<bool, StoreError> {
            self.inner.exists_participant(chat_id, user_id).await
        }

        async fn save_participant(&self, participant: ChatParticipant) -> Result<(), StoreError> {
            self.inner.save_participant(participant).await
        }

        async fn delete_participant(&self, chat_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
            self.inner.delete_participant(chat_id, user_id).await
        }

        async fn find_chats_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, StoreError> {
            self.inner.find_chats_for_user(user_id).await
        }
    }

    #[tokio::test]
    async fn test_direct_chat_race_returns_existing_chat() {
        let store = Arc::new(RacingStore {
            inner: MemoryChatStore::new(),
            hide_first_lookup: AtomicBool::new(false),
        });
        let svc = ChatService::new(store.clone());
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        // Winner creates the chat.
        let winner = svc.create_direct_chat(alice, bob).await.unwrap();

        // Loser's lookup misses, its insert hits the uniqueness constraint,
        // and the fallback re-read returns the winner's chat.
        store.hide_first_lookup.store(true, Ordering::SeqCst);
        let loser = svc.create_direct_chat(alice, bob).await.unwrap();

        assert_eq!(winner.id, loser.id);
    }
}
