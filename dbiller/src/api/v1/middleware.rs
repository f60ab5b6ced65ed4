//! # V1 API Key Authentication Middleware
//!
//! Protects v1 routes (except explicitly public ones like `/health`) with
//! Bearer token authentication, validated against `BILLER_API_KEYS`.
//! Session-level user identity is handled by an upstream collaborator; this
//! check only gates the deployment boundary.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;

use super::response::{ApiResponse, ErrorCode};

/// Axum middleware enforcing Bearer token authentication for v1 routes.
///
/// - `BILLER_API_KEYS` empty/unset → 401; the server still starts, but
///   protected routes are locked down.
/// - Missing or malformed `Authorization: Bearer <token>` header → 401.
/// - Token not in the configured key list → 401.
pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.config.server.api_keys.is_empty() {
        return ApiResponse::<()>::error(
            ErrorCode::Unauthorized,
            "API keys not configured. Set BILLER_API_KEYS to enable access.",
        )
        .into_response();
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        Some(_) => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Malformed Authorization header, expected 'Bearer <token>'",
            )
            .into_response();
        }
        None => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Missing Authorization header",
            )
            .into_response();
        }
    };

    if !state.config.server.api_keys.iter().any(|k| k == token) {
        return ApiResponse::<()>::error(ErrorCode::Unauthorized, "Invalid API key")
            .into_response();
    }

    next.run(request).await
}
