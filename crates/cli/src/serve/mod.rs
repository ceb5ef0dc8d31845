//! `migsafe serve` -- HTTP JSON API server for the worker registry.
//!
//! Exposes the registration, complaint, and renewal workflows as an async
//! HTTP service using `axum` + `tokio`. Two surfaces share one router:
//! the admin surface used by department staff, and the `/esevai/*` kiosk
//! surface used by self-service centres.
//!
//! Admin endpoints:
//! - GET  /health                        - Server status (exempt from auth)
//! - GET  /stats                         - Dashboard counters
//! - GET  /workers?status=...            - List workers (pending/approved/rejected/all)
//! - GET  /workers/expiring?days=N       - Approved workers expiring within N days
//! - GET  /workers/flagged               - Risk-flagged workers
//! - GET  /workers/{id}                  - Fetch one worker
//! - POST /workers                       - Register a worker (enters pending)
//! - POST /workers/{id}/approve          - Approve, assigns registration number
//! - POST /workers/{id}/reject           - Reject with a reason (terminal)
//! - POST /workers/{id}/flag             - Set the risk flag
//! - POST /workers/{id}/unflag           - Clear the risk flag
//! - GET  /complaints?status=...         - List complaints
//! - POST /complaints                    - File a complaint
//! - POST /complaints/{id}/status        - Move a complaint forward
//! - GET  /renewals?status=...           - List renewals
//! - POST /renewals                      - File an admin renewal request
//! - POST /renewals/{id}/approve         - Approve with a new validity window
//! - POST /renewals/{id}/reject          - Reject with a reason
//!
//! Kiosk endpoints (keyed by registration number, not record id):
//! - GET  /esevai/workers/{number}         - Look up an approved worker
//! - POST /esevai/workers/{number}/verify  - Biometric verification (scanner delay)
//! - POST /esevai/workers/{number}/renew   - One-year self-service renewal
//!
//! All responses use Content-Type: application/json.

mod handlers;
mod kiosk;
mod middleware;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Json, Router};
use tower_http::cors::{Any, CorsLayer};

use migsafe_storage::JsonStorage;

use self::handlers::{
    handle_approve_renewal, handle_approve_worker, handle_complaint_status, handle_expiring,
    handle_file_complaint, handle_flag_worker, handle_flagged, handle_get_worker, handle_health,
    handle_list_complaints, handle_list_renewals, handle_list_workers, handle_not_found,
    handle_register_worker, handle_reject_renewal, handle_reject_worker, handle_request_renewal,
    handle_stats, handle_unflag_worker,
};
use self::kiosk::{handle_kiosk_lookup, handle_kiosk_renew, handle_kiosk_verify};
use self::middleware::auth_middleware;
use self::state::AppState;
use crate::mirror::Mirror;

/// Maximum request body size: 1 MB. Registration payloads are small.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default simulated fingerprint scanner delay.
const DEFAULT_SCAN_DELAY_MS: u64 = 2000;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Start the HTTP server on the given port.
///
/// Environment:
/// - `MIGSAFE_API_KEY`: admin surface key; unset = no auth.
/// - `MIGSAFE_KIOSK_KEY`: kiosk surface key; unset = admin key applies.
/// - `MIGSAFE_MIRROR_URL`: remote mirror base URL; unset = no mirroring.
/// - `MIGSAFE_SCAN_DELAY_MS`: kiosk scanner delay (default 2000).
pub async fn start_server(
    storage: JsonStorage,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("MIGSAFE_API_KEY").ok().filter(|k| !k.is_empty());
    let kiosk_key = std::env::var("MIGSAFE_KIOSK_KEY")
        .ok()
        .filter(|k| !k.is_empty());
    let scan_delay_ms = std::env::var("MIGSAFE_SCAN_DELAY_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SCAN_DELAY_MS);
    let mirror = Mirror::from_env();

    if api_key.is_some() {
        eprintln!("Admin API key authentication enabled");
    }
    if kiosk_key.is_some() {
        eprintln!("Kiosk API key authentication enabled");
    }
    if mirror.is_some() {
        eprintln!("Remote mirroring enabled");
    }

    let state = Arc::new(AppState {
        storage,
        api_key,
        kiosk_key,
        mirror,
        scan_delay: Duration::from_millis(scan_delay_ms),
    });

    // CORS: permissive for the local admin UI and kiosk frontends.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/stats", get(handle_stats))
        .route("/workers", get(handle_list_workers).post(handle_register_worker))
        .route("/workers/expiring", get(handle_expiring))
        .route("/workers/flagged", get(handle_flagged))
        .route("/workers/{id}", get(handle_get_worker))
        .route("/workers/{id}/approve", post(handle_approve_worker))
        .route("/workers/{id}/reject", post(handle_reject_worker))
        .route("/workers/{id}/flag", post(handle_flag_worker))
        .route("/workers/{id}/unflag", post(handle_unflag_worker))
        .route(
            "/complaints",
            get(handle_list_complaints).post(handle_file_complaint),
        )
        .route("/complaints/{id}/status", post(handle_complaint_status))
        .route(
            "/renewals",
            get(handle_list_renewals).post(handle_request_renewal),
        )
        .route("/renewals/{id}/approve", post(handle_approve_renewal))
        .route("/renewals/{id}/reject", post(handle_reject_renewal))
        .route("/esevai/workers/{number}", get(handle_kiosk_lookup))
        .route("/esevai/workers/{number}/verify", post(handle_kiosk_verify))
        .route("/esevai/workers/{number}/renew", post(handle_kiosk_renew))
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("MigSafe portal listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    eprintln!("\nReceived shutdown signal...");
}
