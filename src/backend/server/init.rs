/**
 * Server Initialization
 *
 * Builds the axum application: authenticator, store selection, shared
 * state and the router.
 *
 * # Initialization Steps
 *
 * 1. Construct the JWT authenticator (fails fast on a weak secret)
 * 2. Connect to PostgreSQL if configured, otherwise fall back to
 *    in-memory stores
 * 3. Assemble `AppState` and the router
 */

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::backend::auth::{AuthError, Authenticator, JwtAuthenticator};
use crate::backend::chat::db::PgChatStore;
use crate::backend::chat::memory::MemoryChatStore;
use crate::backend::chat::service::ChatService;
use crate::backend::chat::store::ChatStore;
use crate::backend::messaging::db::PgMessageStore;
use crate::backend::messaging::memory::MemoryMessageStore;
use crate::backend::messaging::service::MessageService;
use crate::backend::messaging::store::MessageStore;
use crate::backend::realtime::hub::Hub;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the axum application.
pub async fn create_app(config: ServerConfig) -> Result<Router, AuthError> {
    tracing::info!("Initializing convo server");

    let authenticator: Arc<dyn Authenticator> = Arc::new(JwtAuthenticator::new(
        &config.jwt_secret,
        Duration::from_secs(config.jwt_expiration_secs),
    )?);

    let db_pool = load_database(&config).await;

    let (chat_store, message_store): (Arc<dyn ChatStore>, Arc<dyn MessageStore>) = match &db_pool {
        Some(pool) => (
            Arc::new(PgChatStore::new(pool.clone())),
            Arc::new(PgMessageStore::new(pool.clone())),
        ),
        None => (
            Arc::new(MemoryChatStore::new()),
            Arc::new(MemoryMessageStore::new()),
        ),
    };

    let state = AppState {
        chats: ChatService::new(chat_store),
        messages: MessageService::new(message_store),
        hub: Arc::new(Hub::new()),
        authenticator,
        ws_allow_anonymous: config.ws_allow_anonymous,
    };

    tracing::info!(
        "State initialized (persistence: {}, anonymous ws: {})",
        if db_pool.is_some() { "postgres" } else { "memory" },
        state.ws_allow_anonymous
    );

    Ok(create_router(state))
}
