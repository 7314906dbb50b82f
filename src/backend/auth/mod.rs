//! Authentication Module
//!
//! Token verification for HTTP requests and WebSocket handshakes.
//!
//! The rest of the backend only depends on the [`Authenticator`] trait:
//! given a bearer token it either yields the caller's [`Identity`] or
//! fails. The production implementation is [`JwtAuthenticator`], an HS256
//! JWT verifier. Credential storage and login flows live outside this
//! server; it only consumes tokens (and can mint them, which the test
//! suite and ops tooling rely on).

/// Token types, the `Authenticator` trait and the JWT implementation
pub mod token;

/// Axum middleware that gates `/api` routes on a valid bearer token
pub mod middleware;

// Re-export commonly used types
pub use middleware::auth_middleware;
pub use token::{AuthError, Authenticator, Identity, JwtAuthenticator};
