/**
 * WebSocket Handling and the Connection Gate
 *
 * One inbound connection is authenticated exactly once, at upgrade time,
 * before any subscription is possible:
 *
 * - no credential (or one that is not `Bearer`-shaped) admits the
 *   connection as `anonymous`, if the deployment allows anonymous
 *   connections; otherwise the upgrade is rejected
 * - a present but invalid credential always rejects the upgrade; there is
 *   no silent downgrade to anonymous
 * - a valid credential binds the token subject to the connection for its
 *   whole lifetime; every message the connection sends carries that
 *   subject as sender, never a client-supplied value
 *
 * After the upgrade, the socket is split: a writer task drains the
 * connection's mpsc channel into the sink while the read loop dispatches
 * inbound frames. Teardown always runs `unsubscribe_all`, on clean closes
 * and on transport errors alike.
 */

use axum::{
    extract::{
        ws::{Message as WsFrame, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use uuid::Uuid;

use crate::backend::auth::{Authenticator, Identity};
use crate::backend::error::ApiError;
use crate::backend::realtime::envelope::{WsInbound, WsOutbound};
use crate::backend::realtime::hub::{Hub, SYSTEM_TOPIC};
use crate::backend::server::state::AppState;

/// Sender name used for connections admitted without a credential.
const ANONYMOUS: &str = "anonymous";

/// GET /ws
///
/// Runs the connection gate against the upgrade request headers, then
/// hands the socket to the session loop with the bound identity.
pub async fn handle_ws_upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let identity = authenticate_handshake(
        &headers,
        state.authenticator.as_ref(),
        state.ws_allow_anonymous,
    )?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

/// The connection gate: decide the connection's identity from the
/// handshake headers, or reject the attempt.
fn authenticate_handshake(
    headers: &HeaderMap,
    authenticator: &dyn Authenticator,
    allow_anonymous: bool,
) -> Result<Option<Identity>, ApiError> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let token = match bearer {
        Some(token) => token,
        None => {
            if allow_anonymous {
                tracing::debug!("[Ws] no usable credential in handshake, admitting as anonymous");
                return Ok(None);
            }
            tracing::warn!("[Ws] rejecting unauthenticated connection attempt");
            return Err(ApiError::AuthFailure("credentials required".to_string()));
        }
    };

    // An explicitly presented credential must verify; no anonymous fallback.
    let identity = authenticator.verify(token).map_err(|e| {
        tracing::warn!("[Ws] rejecting connection with invalid credential: {e}");
        ApiError::AuthFailure(e.to_string())
    })?;

    tracing::debug!("[Ws] connection authenticated as {}", identity.subject);
    Ok(Some(identity))
}

/// Per-connection session loop.
async fn handle_socket(socket: WebSocket, state: AppState, identity: Option<Identity>) {
    let connection_id = Uuid::new_v4();
    let authenticated = identity.is_some();
    let sender_name = identity
        .map(|i| i.subject)
        .unwrap_or_else(|| ANONYMOUS.to_string());

    tracing::info!("[Ws] connection {connection_id} opened ({sender_name})");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsOutbound>();

    // Writer task: everything the hub (or this session) queues goes out
    // through here, so publish never performs socket I/O itself.
    let writer = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let text = match serde_json::to_string(&envelope) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[Ws] failed to serialize outbound envelope: {e}");
                    continue;
                }
            };
            if sink.send(WsFrame::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("[Ws] connection {connection_id} transport error: {e}");
                break;
            }
        };

        match frame {
            WsFrame::Text(text) => match serde_json::from_str::<WsInbound>(text.as_str()) {
                Ok(inbound) => {
                    handle_inbound(inbound, &sender_name, connection_id, &tx, &state).await
                }
                Err(e) => {
                    tracing::debug!("[Ws] ignoring unparseable frame from {connection_id}: {e}")
                }
            },
            WsFrame::Close(_) => break,
            // Ping/pong is handled by the transport; binary frames are not
            // part of the protocol.
            _ => {}
        }
    }

    // Mandatory cleanup on every exit path.
    state.hub.unsubscribe_all(connection_id);
    if authenticated {
        state.hub.publish(SYSTEM_TOPIC, &WsOutbound::leave());
    }
    writer.abort();

    tracing::info!("[Ws] connection {connection_id} closed");
}

/// Dispatch one inbound frame.
///
/// `sender_name` is the identity bound at the handshake; inbound frames
/// carry no sender of their own.
pub(crate) async fn handle_inbound(
    frame: WsInbound,
    sender_name: &str,
    connection_id: Uuid,
    tx: &UnboundedSender<WsOutbound>,
    state: &AppState,
) {
    match frame {
        WsInbound::SendMessage { chat_id, content } => {
            // Persist first, then fan out the stored record.
            match state.messages.append(&chat_id, sender_name, &content).await {
                Ok(stored) => {
                    let topic = Hub::topic_for_chat(&stored.chat_id);
                    state.hub.publish(&topic, &WsOutbound::chat(stored));
                }
                Err(e) => {
                    tracing::error!(
                        "[Ws] failed to persist message from {sender_name} in {chat_id}: {e}"
                    );
                }
            }
        }
        WsInbound::Join => {
            state.hub.publish(SYSTEM_TOPIC, &WsOutbound::join());
        }
        WsInbound::Subscribe { topic } => {
            state.hub.subscribe(&topic, connection_id, tx.clone());
        }
        WsInbound::Unsubscribe { topic } => {
            state.hub.unsubscribe(&topic, connection_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::realtime::envelope::WsMessageType;
    use crate::backend::server::state::test_support::memory_state;
    use axum::http::HeaderValue;
    use std::time::Duration;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn jwt() -> crate::backend::auth::JwtAuthenticator {
        crate::backend::auth::JwtAuthenticator::new(
            "socket-test-secret-key-0123456789abcdef",
            Duration::from_secs(3600),
        )
        .unwrap()
    }

    #[test]
    fn test_gate_admits_valid_credential() {
        let auth = jwt();
        let token = auth.issue("alice").unwrap();
        let headers = headers_with_auth(&format!("Bearer {token}"));

        let identity = authenticate_handshake(&headers, &auth, true).unwrap();
        assert_eq!(identity.unwrap().subject, "alice");
    }

    #[test]
    fn test_gate_rejects_invalid_credential_even_when_anonymous_allowed() {
        let auth = jwt();
        let headers = headers_with_auth("Bearer not-a-real-token");

        let result = authenticate_handshake(&headers, &auth, true);
        assert!(matches!(result, Err(ApiError::AuthFailure(_))));
    }

    #[test]
    fn test_gate_admits_anonymous_when_allowed() {
        let auth = jwt();
        let identity = authenticate_handshake(&HeaderMap::new(), &auth, true).unwrap();
        assert!(identity.is_none());

        // A malformed header counts as absent, same as the original.
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        let identity = authenticate_handshake(&headers, &auth, true).unwrap();
        assert!(identity.is_none());
    }

    #[test]
    fn test_gate_rejects_anonymous_when_disallowed() {
        let auth = jwt();
        let result = authenticate_handshake(&HeaderMap::new(), &auth, false);
        assert!(matches!(result, Err(ApiError::AuthFailure(_))));
    }

    #[tokio::test]
    async fn test_send_message_persists_then_fans_out() {
        let state = memory_state();
        let conn_alice = Uuid::new_v4();
        let conn_bob = Uuid::new_v4();
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, mut rx_bob) = mpsc::unbounded_channel();

        state.hub.subscribe("chat.room-1", conn_alice, tx_alice.clone());
        state.hub.subscribe("chat.room-1", conn_bob, tx_bob);

        handle_inbound(
            WsInbound::SendMessage {
                chat_id: "room-1".to_string(),
                content: "Hello!".to_string(),
            },
            "alice",
            conn_alice,
            &tx_alice,
            &state,
        )
        .await;

        // Both subscribers got the envelope, with the bound identity as
        // sender.
        for rx in [&mut rx_alice, &mut rx_bob] {
            let envelope = rx.try_recv().unwrap();
            assert_eq!(envelope.kind, WsMessageType::Chat);
            let data = envelope.data.unwrap();
            assert_eq!(data.chat_id, "room-1");
            assert_eq!(data.sender, "alice");
            assert_eq!(data.content, "Hello!");
        }

        // And the message is in history, last.
        let history = state.messages.history("room-1").await.unwrap();
        assert_eq!(history.last().unwrap().content, "Hello!");
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_messages() {
        let state = memory_state();
        let conn = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_inbound(
            WsInbound::SendMessage {
                chat_id: "room-1".to_string(),
                content: "early".to_string(),
            },
            "alice",
            conn,
            &tx,
            &state,
        )
        .await;

        let late_conn = Uuid::new_v4();
        let (late_tx, mut late_rx) = mpsc::unbounded_channel();
        state.hub.subscribe("chat.room-1", late_conn, late_tx);

        assert!(late_rx.try_recv().is_err());
        // History still has it.
        assert_eq!(state.messages.history("room-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_frame_registers_with_hub() {
        let state = memory_state();
        let conn = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_inbound(
            WsInbound::Subscribe {
                topic: "chat.room-9".to_string(),
            },
            "alice",
            conn,
            &tx,
            &state,
        )
        .await;

        state.hub.publish("chat.room-9", &WsOutbound::join());
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_join_frame_broadcasts_on_system_topic() {
        let state = memory_state();
        let watcher = Uuid::new_v4();
        let (watch_tx, mut watch_rx) = mpsc::unbounded_channel();
        state.hub.subscribe(SYSTEM_TOPIC, watcher, watch_tx);

        let conn = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();
        handle_inbound(WsInbound::Join, "bob", conn, &tx, &state).await;

        let envelope = watch_rx.try_recv().unwrap();
        assert_eq!(envelope.kind, WsMessageType::Join);
        assert!(envelope.data.is_none());
    }
}
