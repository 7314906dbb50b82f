//! Route Configuration
//!
//! - **`router`** - assembles the full application router
//! - **`api_routes`** - the authenticated `/api` surface

/// Router assembly
pub mod router;

/// API route registration
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
