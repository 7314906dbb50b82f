/**
 * Application State Management
 *
 * `AppState` is the central state container handed to the router. The
 * `FromRef` implementations let handlers extract exactly the service they
 * need instead of the whole state.
 *
 * # Thread Safety
 *
 * Every field is cheaply cloneable and safe for concurrent use: the
 * services share their stores through `Arc`, and the hub synchronizes its
 * own subscriber registry internally.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::Authenticator;
use crate::backend::chat::service::ChatService;
use crate::backend::messaging::service::MessageService;
use crate::backend::realtime::hub::Hub;

#[derive(Clone)]
pub struct AppState {
    /// Membership engine.
    pub chats: ChatService,

    /// Message store adapter.
    pub messages: MessageService,

    /// Realtime topic hub.
    pub hub: Arc<Hub>,

    /// Credential verifier shared by the HTTP middleware and the
    /// WebSocket connection gate.
    pub authenticator: Arc<dyn Authenticator>,

    /// Whether the connection gate admits credential-less connections.
    pub ws_allow_anonymous: bool,
}

impl FromRef<AppState> for ChatService {
    fn from_ref(state: &AppState) -> Self {
        state.chats.clone()
    }
}

impl FromRef<AppState> for MessageService {
    fn from_ref(state: &AppState) -> Self {
        state.messages.clone()
    }
}

impl FromRef<AppState> for Arc<Hub> {
    fn from_ref(state: &AppState) -> Self {
        state.hub.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Authenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.authenticator.clone()
    }
}
