//! Server Module
//!
//! Configuration, shared application state and app initialization.
//!
//! - **`config`** - Environment-driven `ServerConfig` and database loading
//! - **`state`** - `AppState` and axum `FromRef` implementations
//! - **`init`** - `create_app`: store selection, state wiring, router

/// Server configuration
pub mod config;

/// Application state
pub mod state;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
