//! HTTP middleware: API key authentication for the admin and kiosk surfaces.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::state::AppState;

/// API key authentication middleware.
///
/// `/esevai/*` routes are checked against `MIGSAFE_KIOSK_KEY`, everything
/// else against `MIGSAFE_API_KEY`; kiosk routes fall back to the admin key
/// when no kiosk key is configured. Requests carry the key as either
/// `Authorization: Bearer <key>` or `X-API-Key: <key>`. `/health` is
/// always exempt.
pub(crate) async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let expected_key = if request.uri().path().starts_with("/esevai/") {
        state.kiosk_key.as_ref().or(state.api_key.as_ref())
    } else {
        state.api_key.as_ref()
    };
    let expected_key = match expected_key {
        Some(k) => k,
        None => return next.run(request).await, // No auth configured
    };

    let bearer = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "));
    if let Some(token) = bearer {
        if token == expected_key {
            return next.run(request).await;
        }
        return super::json_error(StatusCode::FORBIDDEN, "invalid API key").into_response();
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok());
    if let Some(key) = header_key {
        if key == expected_key {
            return next.run(request).await;
        }
        return super::json_error(StatusCode::FORBIDDEN, "invalid API key").into_response();
    }

    super::json_error(StatusCode::UNAUTHORIZED, "authentication required").into_response()
}
