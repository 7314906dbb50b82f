//! Chat Membership Module
//!
//! Everything about who is in which conversation: the domain types, the
//! `ChatStore` seam, its PostgreSQL and in-memory implementations, and the
//! membership engine (`ChatService`) that owns the creation and mutation
//! rules.
//!
//! # Invariants
//!
//! - A direct chat has exactly two MEMBER participants for its entire
//!   lifetime; membership mutations on it are rejected.
//! - A user appears at most once per chat.
//! - A direct chat between two users is unique; concurrent first-creation
//!   is resolved by the store's uniqueness constraint over the
//!   canonicalized pair key.

/// Domain types (chats, participants, roles)
pub mod types;

/// The `ChatStore` trait
pub mod store;

/// In-memory store (tests and database-less deployments)
pub mod memory;

/// PostgreSQL store
pub mod db;

/// Membership engine
pub mod service;

/// HTTP handlers for the chat API
pub mod handlers;

// Re-export commonly used types
pub use service::ChatService;
pub use store::ChatStore;
pub use types::{Chat, ChatParticipant, ChatRole, ChatType};
