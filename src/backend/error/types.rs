/**
 * Backend Error Types
 *
 * This module defines the error taxonomy for the backend.
 *
 * `ApiError` is the domain-facing taxonomy: every expected failure of a
 * membership or realtime operation is a distinct variant so boundary
 * layers can map each one to a specific transport status. `StoreError`
 * is the storage-facing error the store implementations speak; anything
 * other than the direct-chat uniqueness conflict surfaces to clients as
 * the generic `Internal` kind.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Storage-layer errors produced by `ChatStore` and `MessageStore`
/// implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store's uniqueness constraint over the direct-chat pair key
    /// fired: another writer created the chat first.
    #[error("direct chat already exists for this pair")]
    DuplicateDirectChat,

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Backend error taxonomy
///
/// Each variant is an expected, recoverable condition with its own HTTP
/// status, except `Internal` which wraps unexpected store failures and
/// deliberately exposes no detail to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The referenced chat does not exist.
    #[error("Chat not found")]
    ChatNotFound,

    /// A membership mutation was attempted on a chat that forbids it
    /// (direct chats are immutable in membership).
    #[error("{0}")]
    InvalidOperation(String),

    /// The user already has a participant row in the chat.
    #[error("User already in chat")]
    AlreadyMember,

    /// The user has no participant row in the chat.
    #[error("User not in chat")]
    NotAMember,

    /// Missing-when-required, malformed or invalid credential.
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    /// Unexpected failure (store unavailable, etc.). The display string
    /// is generic; the source is logged at the boundary only.
    #[error("Unexpected error occurred")]
    Internal(#[from] StoreError),
}

impl ApiError {
    /// The HTTP status for this error.
    ///
    /// This is the single mapping table from domain failure kind to
    /// transport status, consulted once at the response boundary:
    ///
    /// - `ChatNotFound` - 404 Not Found
    /// - `InvalidOperation` - 403 Forbidden
    /// - `AlreadyMember` - 409 Conflict
    /// - `NotAMember` - 404 Not Found
    /// - `AuthFailure` - 401 Unauthorized
    /// - `Internal` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ChatNotFound => StatusCode::NOT_FOUND,
            Self::InvalidOperation(_) => StatusCode::FORBIDDEN,
            Self::AlreadyMember => StatusCode::CONFLICT,
            Self::NotAMember => StatusCode::NOT_FOUND,
            Self::AuthFailure(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
