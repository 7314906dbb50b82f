/**
 * Chat API Handlers
 *
 * HTTP request/response shaping for the membership engine. All routes sit
 * behind the auth middleware; the verified identity arrives as a request
 * extension.
 *
 * # Routes
 *
 * - `POST /api/chats/direct` - Get or create a direct chat
 * - `POST /api/chats/group` - Create a group chat
 * - `POST /api/chats/{chat_id}/participants/{user_id}` - Add a member
 * - `DELETE /api/chats/{chat_id}/participants/{user_id}` - Remove a member
 * - `GET /api/chats/{chat_id}` - Fetch a chat with participants
 * - `GET /api/chats/user/{user_id}` - List a user's chats
 */

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::Identity;
use crate::backend::chat::service::ChatService;
use crate::backend::chat::types::{Chat, ChatRole, ChatType};
use crate::backend::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateDirectChatRequest {
    pub user1: Uuid,
    pub user2: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupChatRequest {
    pub name: String,
    pub creator_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatParticipantResponse {
    pub user_id: Uuid,
    pub role: ChatRole,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub id: Uuid,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    pub participants: Vec<ChatParticipantResponse>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            name: chat.name,
            chat_type: chat.chat_type,
            participants: chat
                .participants
                .into_iter()
                .map(|p| ChatParticipantResponse {
                    user_id: p.user_id,
                    role: p.role,
                })
                .collect(),
        }
    }
}

/// POST /api/chats/direct
pub async fn create_direct_chat(
    State(chats): State<ChatService>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateDirectChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    tracing::debug!(
        "[Api] {} requested direct chat for {} and {}",
        identity.subject,
        req.user1,
        req.user2
    );
    let chat = chats.create_direct_chat(req.user1, req.user2).await?;
    Ok(Json(chat.into()))
}

/// POST /api/chats/group
pub async fn create_group_chat(
    State(chats): State<ChatService>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateGroupChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    tracing::debug!(
        "[Api] {} creating group chat \"{}\"",
        identity.subject,
        req.name
    );
    let chat = chats.create_group_chat(&req.name, req.creator_id).await?;
    Ok(Json(chat.into()))
}

/// POST /api/chats/{chat_id}/participants/{user_id}
pub async fn add_member(
    State(chats): State<ChatService>,
    Path((chat_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<(), ApiError> {
    chats.add_member(chat_id, user_id).await
}

/// DELETE /api/chats/{chat_id}/participants/{user_id}
pub async fn remove_member(
    State(chats): State<ChatService>,
    Path((chat_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<(), ApiError> {
    chats.remove_member(chat_id, user_id).await
}

/// GET /api/chats/{chat_id}
pub async fn get_chat(
    State(chats): State<ChatService>,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<ChatResponse>, ApiError> {
    let chat = chats.get_chat(chat_id).await?;
    Ok(Json(chat.into()))
}

/// GET /api/chats/user/{user_id}
pub async fn get_user_chats(
    State(chats): State<ChatService>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ChatResponse>>, ApiError> {
    let chats = chats.chats_for_user(user_id).await?;
    Ok(Json(chats.into_iter().map(Into::into).collect()))
}
