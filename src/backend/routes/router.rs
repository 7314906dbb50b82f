/**
 * Router Configuration
 *
 * Combines all route groups into the application router:
 *
 * 1. Authenticated `/api` routes (membership and history)
 * 2. `GET /ws` - the WebSocket endpoint (authentication happens in the
 *    connection gate, not the API middleware, because the gate has its
 *    own anonymous-admission policy)
 * 3. Fallback handler for unknown paths
 */

use axum::{routing, Router};

use crate::backend::realtime::socket::handle_ws_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the axum router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(configure_api_routes(state.clone()))
        .route("/ws", routing::get(handle_ws_upgrade))
        .fallback(|| async { "404 Not Found" })
        .with_state(state)
}
