//! Backend Error Module
//!
//! This module defines the error types used across the backend and their
//! conversion to HTTP responses.
//!
//! # Module Structure
//!
//! - **`types`** - Error type definitions and the status mapping table
//! - **`conversion`** - `IntoResponse` implementation for handlers
//!
//! # Error Taxonomy
//!
//! Domain failures (`ChatNotFound`, `InvalidOperation`, `AlreadyMember`,
//! `NotAMember`, `AuthFailure`) are expected, recoverable conditions; each
//! maps to a specific HTTP status. Store failures are collapsed into a
//! single `Internal` kind whose client-facing message carries no detail.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{ApiError, StoreError};
