/**
 * Error Conversion
 *
 * Converts backend errors into HTTP responses so handlers can return
 * `Result<_, ApiError>` directly.
 *
 * # Response Format
 *
 * Error responses are JSON:
 * ```json
 * {
 *   "error": "Chat not found",
 *   "status": 404
 * }
 * ```
 */

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::backend::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures keep their detail server-side.
        if let ApiError::Internal(ref source) = self {
            tracing::error!("[Api] internal error: {source}");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .expect("static error response")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_status() {
        let response = ApiError::AlreadyMember.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_into_response_content_type() {
        let response = ApiError::ChatNotFound.into_response();
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }
}
