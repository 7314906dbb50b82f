/**
 * Authentication Middleware
 *
 * Gates protected routes on a valid bearer token. The verified identity
 * is attached to the request extensions so handlers can read it without
 * reconstructing any ambient security state.
 */

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;

/// Authentication middleware
///
/// 1. Extracts the JWT from the `Authorization: Bearer <token>` header
/// 2. Verifies it through the configured authenticator
/// 3. Attaches the resulting `Identity` to the request extensions
///
/// Returns 401 Unauthorized if the token is missing, malformed or invalid.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("[Api] missing Authorization header");
            ApiError::AuthFailure("missing credentials".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("[Api] invalid Authorization header format");
        ApiError::AuthFailure("invalid Authorization header format".to_string())
    })?;

    let identity = state.authenticator.verify(token).map_err(|e| {
        tracing::warn!("[Api] token rejected: {e}");
        ApiError::AuthFailure(e.to_string())
    })?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
