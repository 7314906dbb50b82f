//! Convo - Chat Server Library
//!
//! Convo is a backend chat server providing direct (1:1) and group
//! conversations with persistent message history and real-time delivery
//! over WebSockets.
//!
//! # Overview
//!
//! This library provides the core functionality for the Convo server:
//! - Chat membership management (direct and group chats, roles)
//! - Ordered per-chat message history with PostgreSQL persistence
//! - Topic-based real-time fan-out to connected WebSocket clients
//! - JWT-authenticated connections and API requests
//!
//! # Module Structure
//!
//! All server-side code lives under the **`backend`** module:
//!
//! - **`backend::server`** - Configuration, application state, initialization
//! - **`backend::routes`** - HTTP route configuration and router assembly
//! - **`backend::chat`** - Chat domain types, stores and the membership engine
//! - **`backend::messaging`** - Message persistence and history retrieval
//! - **`backend::realtime`** - Topic hub, protocol frames, WebSocket handling
//! - **`backend::auth`** - Token verification and auth middleware
//! - **`backend::error`** - Error taxonomy and HTTP response mapping
//!
//! # Usage
//!
//! ```rust,no_run
//! use convo::backend::server::config::ServerConfig;
//! use convo::backend::server::init::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env();
//! let app = create_app(config).await?;
//! // Serve `app` with axum
//! # Ok(())
//! # }
//! ```

pub mod backend;
