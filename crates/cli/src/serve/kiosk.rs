//! Kiosk (e-sevai) route handlers.
//!
//! The kiosk surface is keyed by registration number, never by record id:
//! the worker at the counter only knows the number printed on their card.
//! Lookups that miss return 404 with a message the kiosk shows verbatim.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use migsafe_registry::lifecycle;

use super::handlers::{error_response, push_mirror};
use super::json_error;
use super::state::AppState;

fn number_not_found(number: &str) -> Response {
    json_error(
        StatusCode::NOT_FOUND,
        &format!("no approved worker with registration number {}", number),
    )
    .into_response()
}

/// GET /esevai/workers/{number}
pub(crate) async fn handle_kiosk_lookup(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Response {
    match lifecycle::find_by_registration_number(&state.storage, &number).await {
        Ok(Some(worker)) => (StatusCode::OK, Json(worker)).into_response(),
        Ok(None) => number_not_found(&number),
        Err(e) => error_response(e),
    }
}

/// POST /esevai/workers/{number}/verify
///
/// Simulates the fingerprint scanner: the handler sleeps for the
/// configured scan delay, then marks the worker's biometric verified.
pub(crate) async fn handle_kiosk_verify(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Response {
    let worker = match lifecycle::find_by_registration_number(&state.storage, &number).await {
        Ok(Some(worker)) => worker,
        Ok(None) => return number_not_found(&number),
        Err(e) => return error_response(e),
    };

    tokio::time::sleep(state.scan_delay).await;

    match lifecycle::verify_biometric(&state.storage, &worker.id).await {
        Ok(verified) => {
            push_mirror(&state, "workers", &verified);
            (StatusCode::OK, Json(verified)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /esevai/workers/{number}/renew
pub(crate) async fn handle_kiosk_renew(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Response {
    match lifecycle::kiosk_renew(&state.storage, &number).await {
        Ok((worker, renewal)) => {
            push_mirror(&state, "workers", &worker);
            push_mirror(&state, "renewals", &renewal);
            let body = serde_json::json!({
                "worker": worker,
                "renewal": renewal,
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => error_response(e),
    }
}
