//! Messaging Module
//!
//! Persists chat messages and serves ordered history. Messages are
//! immutable once stored; ordering is creation time ascending with ties
//! broken by insertion order. The chat id on a message is the external
//! identifier used on the realtime protocol, deliberately not a foreign
//! key: neither append nor history validates chat existence, and history
//! for an unknown chat is an empty list.

/// `Message` type and the `MessageStore` trait
pub mod store;

/// In-memory store (tests and database-less deployments)
pub mod memory;

/// PostgreSQL store
pub mod db;

/// Message store adapter
pub mod service;

/// HTTP handler for history retrieval
pub mod handlers;

// Re-export commonly used types
pub use service::MessageService;
pub use store::{Message, MessageStore};
