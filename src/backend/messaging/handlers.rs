/**
 * Message History Handler
 *
 * Pull-based history retrieval; the realtime path only delivers messages
 * published while a connection is subscribed, so clients fetch the
 * backlog here.
 */

use axum::{
    extract::{Path, State},
    Json,
};

use crate::backend::error::ApiError;
use crate::backend::messaging::service::MessageService;
use crate::backend::messaging::store::Message;

/// GET /api/messages/{chat_id}
///
/// The full ordered history of a chat, oldest first. Unknown chat ids
/// return an empty list, not 404.
pub async fn get_chat_history(
    State(messages): State<MessageService>,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let history = messages.history(&chat_id).await?;
    Ok(Json(history))
}
