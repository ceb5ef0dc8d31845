//! Admin route handlers: registration review, complaints, renewals, stats.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use migsafe_registry::{lifecycle, query, stats, NewComplaint, NewWorker, RegistryError};
use migsafe_storage::{ComplaintStatus, RegistryStorage, RenewalStatus, WorkerStatus};

use super::json_error;
use super::state::AppState;

/// Map a lifecycle error to an HTTP response.
///
/// Missing records are 404, malformed input is 422, state-machine
/// violations are 409, storage failures are 500.
pub(crate) fn error_response(err: RegistryError) -> Response {
    use RegistryError::*;
    let status = match &err {
        WorkerNotFound { .. } | ComplaintNotFound { .. } | RenewalNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        EmptyReason | MissingValidityDates | InvalidDate { .. } | InvalidValidityWindow { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        NotPending { .. }
        | NotApproved { .. }
        | RenewalProcessed { .. }
        | InvalidStatusChange { .. }
        | BiometricNotVerified { .. }
        | NoValidityWindow { .. } => StatusCode::CONFLICT,
        Storage(_) => {
            eprintln!("storage error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    json_error(status, &err.to_string()).into_response()
}

/// Push a committed record to the mirror, if one is configured.
pub(crate) fn push_mirror<T: serde::Serialize>(state: &AppState, table: &str, record: &T) {
    if let Some(mirror) = &state.mirror {
        mirror.push(table, record);
    }
}

#[derive(Deserialize)]
pub(crate) struct StatusQuery {
    status: Option<String>,
}

/// `status=all` and an absent parameter both mean "no filter".
fn parse_filter<T: std::str::FromStr<Err = String>>(
    raw: &Option<String>,
) -> Result<Option<T>, Response> {
    match raw.as_deref() {
        None | Some("all") => Ok(None),
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|e| json_error(StatusCode::UNPROCESSABLE_ENTITY, &e).into_response()),
    }
}

#[derive(Deserialize)]
pub(crate) struct ReasonBody {
    reason: String,
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /stats
pub(crate) async fn handle_stats(State(state): State<Arc<AppState>>) -> Response {
    match stats::dashboard_stats(&state.storage).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(e),
    }
}

// ── Workers ───────────────────────────────────────────────────────────────

/// GET /workers?status=pending|approved|rejected|all
pub(crate) async fn handle_list_workers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusQuery>,
) -> Response {
    let filter: Option<WorkerStatus> = match parse_filter(&params.status) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    match state.storage.list_workers().await {
        Ok(workers) => {
            let workers = query::workers_by_status(workers, filter);
            (StatusCode::OK, Json(workers)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

#[derive(Deserialize)]
pub(crate) struct ExpiringQuery {
    days: Option<i64>,
}

/// GET /workers/expiring?days=N (default 30)
pub(crate) async fn handle_expiring(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpiringQuery>,
) -> Response {
    let days = params.days.unwrap_or(stats::EXPIRING_SOON_DAYS);
    match state.storage.list_workers().await {
        Ok(workers) => {
            let expiring = query::expiring_within(workers, days, migsafe_registry::dates::today_utc());
            (StatusCode::OK, Json(expiring)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET /workers/flagged
pub(crate) async fn handle_flagged(State(state): State<Arc<AppState>>) -> Response {
    match state.storage.list_workers().await {
        Ok(workers) => (StatusCode::OK, Json(query::risk_flagged(workers))).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// GET /workers/{id}
pub(crate) async fn handle_get_worker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match lifecycle::get_worker(&state.storage, &id).await {
        Ok(Some(worker)) => (StatusCode::OK, Json(worker)).into_response(),
        Ok(None) => json_error(
            StatusCode::NOT_FOUND,
            &format!("worker not found: {}", id),
        )
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /workers
pub(crate) async fn handle_register_worker(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewWorker>,
) -> Response {
    match lifecycle::register_worker(&state.storage, body).await {
        Ok(worker) => {
            push_mirror(&state, "workers", &worker);
            (StatusCode::CREATED, Json(worker)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /workers/{id}/approve
pub(crate) async fn handle_approve_worker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match lifecycle::approve_worker(&state.storage, &id).await {
        Ok(worker) => {
            push_mirror(&state, "workers", &worker);
            (StatusCode::OK, Json(worker)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /workers/{id}/reject
pub(crate) async fn handle_reject_worker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ReasonBody>,
) -> Response {
    match lifecycle::reject_worker(&state.storage, &id, &body.reason).await {
        Ok(worker) => {
            push_mirror(&state, "workers", &worker);
            (StatusCode::OK, Json(worker)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /workers/{id}/flag
pub(crate) async fn handle_flag_worker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ReasonBody>,
) -> Response {
    match lifecycle::set_risk_flag(&state.storage, &id, &body.reason).await {
        Ok(worker) => {
            push_mirror(&state, "workers", &worker);
            (StatusCode::OK, Json(worker)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /workers/{id}/unflag
pub(crate) async fn handle_unflag_worker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match lifecycle::clear_risk_flag(&state.storage, &id).await {
        Ok(worker) => {
            push_mirror(&state, "workers", &worker);
            (StatusCode::OK, Json(worker)).into_response()
        }
        Err(e) => error_response(e),
    }
}

// ── Complaints ────────────────────────────────────────────────────────────

/// GET /complaints?status=open|in_review|resolved|closed|all
pub(crate) async fn handle_list_complaints(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusQuery>,
) -> Response {
    let filter: Option<ComplaintStatus> = match parse_filter(&params.status) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    match state.storage.list_complaints().await {
        Ok(complaints) => {
            let complaints = query::complaints_by_status(complaints, filter);
            (StatusCode::OK, Json(complaints)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// POST /complaints
pub(crate) async fn handle_file_complaint(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewComplaint>,
) -> Response {
    match lifecycle::file_complaint(&state.storage, body).await {
        Ok(complaint) => {
            push_mirror(&state, "complaints", &complaint);
            (StatusCode::CREATED, Json(complaint)).into_response()
        }
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub(crate) struct ComplaintStatusBody {
    status: ComplaintStatus,
    #[serde(default)]
    resolution_notes: Option<String>,
}

/// POST /complaints/{id}/status
pub(crate) async fn handle_complaint_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ComplaintStatusBody>,
) -> Response {
    match lifecycle::update_complaint_status(&state.storage, &id, body.status, body.resolution_notes)
        .await
    {
        Ok(complaint) => {
            push_mirror(&state, "complaints", &complaint);
            (StatusCode::OK, Json(complaint)).into_response()
        }
        Err(e) => error_response(e),
    }
}

// ── Renewals ──────────────────────────────────────────────────────────────

/// GET /renewals?status=pending|approved|rejected|all
pub(crate) async fn handle_list_renewals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusQuery>,
) -> Response {
    let filter: Option<RenewalStatus> = match parse_filter(&params.status) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    match state.storage.list_renewals().await {
        Ok(renewals) => {
            let renewals = query::renewals_by_status(renewals, filter);
            (StatusCode::OK, Json(renewals)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

#[derive(Deserialize)]
pub(crate) struct RenewalRequestBody {
    worker_id: String,
}

/// POST /renewals
pub(crate) async fn handle_request_renewal(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RenewalRequestBody>,
) -> Response {
    match lifecycle::request_renewal(&state.storage, &body.worker_id).await {
        Ok(renewal) => {
            push_mirror(&state, "renewals", &renewal);
            (StatusCode::CREATED, Json(renewal)).into_response()
        }
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub(crate) struct RenewalApprovalBody {
    #[serde(default)]
    new_valid_from: Option<String>,
    #[serde(default)]
    new_valid_until: Option<String>,
}

/// POST /renewals/{id}/approve
pub(crate) async fn handle_approve_renewal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RenewalApprovalBody>,
) -> Response {
    let (from, until) = match (&body.new_valid_from, &body.new_valid_until) {
        (Some(from), Some(until)) => (from.as_str(), until.as_str()),
        _ => return error_response(RegistryError::MissingValidityDates),
    };
    match lifecycle::approve_renewal(&state.storage, &id, from, until).await {
        Ok(renewal) => {
            push_mirror(&state, "renewals", &renewal);
            (StatusCode::OK, Json(renewal)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /renewals/{id}/reject
pub(crate) async fn handle_reject_renewal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ReasonBody>,
) -> Response {
    match lifecycle::reject_renewal(&state.storage, &id, &body.reason).await {
        Ok(renewal) => {
            push_mirror(&state, "renewals", &renewal);
            (StatusCode::OK, Json(renewal)).into_response()
        }
        Err(e) => error_response(e),
    }
}
