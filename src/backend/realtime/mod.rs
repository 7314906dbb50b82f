//! Real-time Delivery Module
//!
//! Live fan-out of chat messages to connected WebSocket clients.
//!
//! # Architecture
//!
//! - **`hub`** - Per-topic subscriber registries and the publish loop
//! - **`envelope`** - The tagged frame protocol (inbound and outbound)
//! - **`socket`** - WebSocket upgrade, connection gate, frame dispatch
//!
//! # Topics
//!
//! Topics are plain strings derived from chat ids (`chat.<chatId>`), plus
//! the server-wide `system` topic for JOIN/LEAVE events. Topic membership
//! is never persisted and there is no replay: a connection only receives
//! what is published while it is subscribed. Backlog recovery is the
//! history endpoint's job.

/// Topic hub
pub mod hub;

/// Protocol frames
pub mod envelope;

/// WebSocket handling and the connection gate
pub mod socket;

// Re-export commonly used types
pub use envelope::{WsInbound, WsMessageType, WsOutbound};
pub use hub::{Hub, SYSTEM_TOPIC};
