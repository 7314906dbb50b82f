/**
 * API Route Handlers
 *
 * Registers the authenticated REST surface:
 *
 * ## Chats
 * - `POST /api/chats/direct` - Get or create a direct chat
 * - `POST /api/chats/group` - Create a group chat
 * - `POST /api/chats/{chat_id}/participants/{user_id}` - Add a member
 * - `DELETE /api/chats/{chat_id}/participants/{user_id}` - Remove a member
 * - `GET /api/chats/{chat_id}` - Fetch a chat
 * - `GET /api/chats/user/{user_id}` - List a user's chats
 *
 * ## Messages
 * - `GET /api/messages/{chat_id}` - Ordered message history
 *
 * Every route here requires a JWT in the `Authorization` header; the auth
 * middleware rejects the request with 401 otherwise.
 */

use axum::{middleware, routing, Router};

use crate::backend::auth::middleware::auth_middleware;
use crate::backend::chat::handlers::{
    add_member, create_direct_chat, create_group_chat, get_chat, get_user_chats, remove_member,
};
use crate::backend::messaging::handlers::get_chat_history;
use crate::backend::server::state::AppState;

/// Build the `/api` sub-router with the auth middleware applied.
pub fn configure_api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/chats/direct", routing::post(create_direct_chat))
        .route("/api/chats/group", routing::post(create_group_chat))
        .route(
            "/api/chats/{chat_id}/participants/{user_id}",
            routing::post(add_member).delete(remove_member),
        )
        .route("/api/chats/{chat_id}", routing::get(get_chat))
        .route("/api/chats/user/{user_id}", routing::get(get_user_chats))
        .route("/api/messages/{chat_id}", routing::get(get_chat_history))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
