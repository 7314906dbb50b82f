//! Backend Module
//!
//! This module contains all server-side code for the Convo chat server.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`chat`** - Chat membership: domain types, stores, membership engine
//! - **`messaging`** - Message persistence and ordered history retrieval
//! - **`realtime`** - Topic hub, protocol envelopes, WebSocket connections
//! - **`auth`** - Token verification, JWT implementation, auth middleware
//! - **`error`** - Error taxonomy and HTTP response conversion
//!
//! # State Management
//!
//! Shared state (`AppState`) holds the membership engine, the message
//! service, the realtime hub and the authenticator. The hub's subscriber
//! registry is the only shared mutable state; it is synchronized internally
//! so handlers never take locks themselves.
//!
//! # Control Flow
//!
//! HTTP calls mutate membership through the `ChatService`. A WebSocket
//! client passes the connection gate once at upgrade time, subscribes to
//! chat topics, and receives every message published to those topics for
//! as long as the connection lives. Sending a message persists it first,
//! then fans it out to the current subscribers of the chat's topic.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Chat membership engine and stores
pub mod chat;

/// Message persistence and history
pub mod messaging;

/// Real-time hub and WebSocket handling
pub mod realtime;

/// Authentication and token handling
pub mod auth;

/// Backend error types
pub mod error;

// Re-export commonly used types
pub use error::ApiError;
pub use server::state::AppState;
