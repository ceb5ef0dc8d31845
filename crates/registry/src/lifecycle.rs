//! The worker lifecycle state machine.
//!
//! Workers: `pending --approve--> approved`, `pending --reject--> rejected`
//! (terminal), with an orthogonal risk flag on any status. Complaints move
//! forward only: `open -> in_review -> resolved | closed`. Renewals come in
//! two channels: admin requests reviewed as `pending -> approved | rejected`,
//! and kiosk renewals that require a verified biometric and append an
//! already-approved record.
//!
//! Every operation follows the same shape: begin a snapshot, read the
//! affected collections, validate, rewrite them whole, commit. Validation
//! failures abort the snapshot and leave the store untouched.

use serde::{Deserialize, Serialize};

use migsafe_storage::{
    ComplainantType, ComplaintRecord, ComplaintStatus, ComplaintType, RegistryStorage,
    RenewalChannel, RenewalRecord, RenewalStatus, WorkerRecord, WorkerStatus,
};

use crate::dates;
use crate::error::RegistryError;
use crate::identity;

/// Intake shape for a new registration. Everything the form collects;
/// the engine adds identity, status, and audit fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWorker {
    pub full_name: String,
    #[serde(default)]
    pub aadhaar_number: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    pub state: String,
    pub district: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    pub job_type: String,
    #[serde(default)]
    pub contractor_id: Option<String>,
    #[serde(default)]
    pub employer_name: Option<String>,
    #[serde(default)]
    pub worksite_location: Option<String>,
    #[serde(default)]
    pub stay_valid_from: Option<String>,
    #[serde(default)]
    pub stay_valid_until: Option<String>,
}

/// Intake shape for a new complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComplaint {
    #[serde(default)]
    pub worker_id: Option<String>,
    pub complaint_type: ComplaintType,
    pub description: String,
    pub complainant_name: String,
    pub complainant_type: ComplainantType,
    #[serde(default)]
    pub complainant_contact: Option<String>,
    #[serde(default)]
    pub against_name: Option<String>,
    #[serde(default)]
    pub against_role: Option<String>,
}

/// Commit on success, abort on failure. Abort failures are ignored: the
/// snapshot's staged writes are discarded either way.
async fn finish<S: RegistryStorage, T>(
    storage: &S,
    snapshot: S::Snapshot,
    result: Result<T, RegistryError>,
) -> Result<T, RegistryError> {
    match result {
        Ok(value) => {
            storage.commit_snapshot(snapshot).await?;
            Ok(value)
        }
        Err(e) => {
            let _ = storage.abort_snapshot(snapshot).await;
            Err(e)
        }
    }
}

fn require_reason(reason: &str) -> Result<String, RegistryError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::EmptyReason);
    }
    Ok(trimmed.to_string())
}

// ── Worker operations ─────────────────────────────────────────────────────

/// Register a new worker. The record enters the queue as `pending`.
pub async fn register_worker<S: RegistryStorage>(
    storage: &S,
    new: NewWorker,
) -> Result<WorkerRecord, RegistryError> {
    let mut snapshot = storage.begin_snapshot().await?;
    let result = register_in(storage, &mut snapshot, new).await;
    finish(storage, snapshot, result).await
}

async fn register_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    new: NewWorker,
) -> Result<WorkerRecord, RegistryError> {
    let mut workers = storage.workers(snapshot).await?;
    let id = identity::unique_id("W", |cand| workers.iter().any(|w| w.id == cand));
    let now = dates::now_rfc3339();
    let record = WorkerRecord {
        id,
        registration_number: None,
        full_name: new.full_name,
        aadhaar_number: new.aadhaar_number,
        mobile_number: new.mobile_number,
        email: new.email,
        date_of_birth: new.date_of_birth,
        gender: new.gender,
        state: new.state,
        district: new.district,
        address: new.address,
        pincode: new.pincode,
        job_type: new.job_type,
        contractor_id: new.contractor_id,
        employer_name: new.employer_name,
        worksite_location: new.worksite_location,
        stay_valid_from: new.stay_valid_from,
        stay_valid_until: new.stay_valid_until,
        status: WorkerStatus::Pending,
        rejection_reason: None,
        has_risk_flag: false,
        risk_flag_reason: None,
        risk_flag_date: None,
        biometric: Default::default(),
        renewal_count: 0,
        last_renewal: None,
        created_at: now.clone(),
        updated_at: now,
        approved_at: None,
    };
    workers.push(record.clone());
    storage.put_workers(snapshot, workers).await?;
    Ok(record)
}

/// Approve a pending registration.
///
/// Assigns the registration number at exactly this transition. The number
/// is drawn until unique against every number already in the collection,
/// inside the same snapshot, so a committed number never collides.
pub async fn approve_worker<S: RegistryStorage>(
    storage: &S,
    id: &str,
) -> Result<WorkerRecord, RegistryError> {
    let mut snapshot = storage.begin_snapshot().await?;
    let result = approve_in(storage, &mut snapshot, id).await;
    finish(storage, snapshot, result).await
}

async fn approve_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    id: &str,
) -> Result<WorkerRecord, RegistryError> {
    let mut workers = storage.workers(snapshot).await?;
    let idx = find_worker(&workers, id)?;
    if workers[idx].status != WorkerStatus::Pending {
        return Err(RegistryError::NotPending {
            id: id.to_string(),
            status: workers[idx].status,
        });
    }

    let number = identity::unique_registration_number(|cand| {
        workers
            .iter()
            .any(|w| w.registration_number.as_deref() == Some(cand))
    });
    let now = dates::now_rfc3339();

    let worker = &mut workers[idx];
    worker.status = WorkerStatus::Approved;
    worker.registration_number = Some(number);
    worker.approved_at = Some(now.clone());
    worker.updated_at = now;
    let approved = worker.clone();

    storage.put_workers(snapshot, workers).await?;
    Ok(approved)
}

/// Reject a pending registration. Requires a non-empty reason; terminal.
pub async fn reject_worker<S: RegistryStorage>(
    storage: &S,
    id: &str,
    reason: &str,
) -> Result<WorkerRecord, RegistryError> {
    let reason = require_reason(reason)?;
    let mut snapshot = storage.begin_snapshot().await?;
    let result = reject_in(storage, &mut snapshot, id, reason).await;
    finish(storage, snapshot, result).await
}

async fn reject_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    id: &str,
    reason: String,
) -> Result<WorkerRecord, RegistryError> {
    let mut workers = storage.workers(snapshot).await?;
    let idx = find_worker(&workers, id)?;
    if workers[idx].status != WorkerStatus::Pending {
        return Err(RegistryError::NotPending {
            id: id.to_string(),
            status: workers[idx].status,
        });
    }

    let worker = &mut workers[idx];
    worker.status = WorkerStatus::Rejected;
    worker.rejection_reason = Some(reason);
    worker.updated_at = dates::now_rfc3339();
    let rejected = worker.clone();

    storage.put_workers(snapshot, workers).await?;
    Ok(rejected)
}

/// Set the risk flag on a worker of any status. Requires a non-empty reason.
pub async fn set_risk_flag<S: RegistryStorage>(
    storage: &S,
    id: &str,
    reason: &str,
) -> Result<WorkerRecord, RegistryError> {
    let reason = require_reason(reason)?;
    let mut snapshot = storage.begin_snapshot().await?;
    let result = flag_in(storage, &mut snapshot, id, Some(reason)).await;
    finish(storage, snapshot, result).await
}

/// Clear the risk flag. No reason required.
pub async fn clear_risk_flag<S: RegistryStorage>(
    storage: &S,
    id: &str,
) -> Result<WorkerRecord, RegistryError> {
    let mut snapshot = storage.begin_snapshot().await?;
    let result = flag_in(storage, &mut snapshot, id, None).await;
    finish(storage, snapshot, result).await
}

async fn flag_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    id: &str,
    reason: Option<String>,
) -> Result<WorkerRecord, RegistryError> {
    let mut workers = storage.workers(snapshot).await?;
    let idx = find_worker(&workers, id)?;

    let worker = &mut workers[idx];
    match reason {
        Some(reason) => {
            worker.has_risk_flag = true;
            worker.risk_flag_reason = Some(reason);
            worker.risk_flag_date = Some(dates::now_rfc3339());
        }
        None => {
            worker.has_risk_flag = false;
            worker.risk_flag_reason = None;
            worker.risk_flag_date = None;
        }
    }
    worker.updated_at = dates::now_rfc3339();
    let flagged = worker.clone();

    storage.put_workers(snapshot, workers).await?;
    Ok(flagged)
}

/// Look up a worker by record id (committed state, read-only).
pub async fn get_worker<S: RegistryStorage>(
    storage: &S,
    id: &str,
) -> Result<Option<WorkerRecord>, RegistryError> {
    let workers = storage.list_workers().await?;
    Ok(workers.into_iter().find(|w| w.id == id))
}

fn find_worker(workers: &[WorkerRecord], id: &str) -> Result<usize, RegistryError> {
    workers
        .iter()
        .position(|w| w.id == id)
        .ok_or_else(|| RegistryError::WorkerNotFound { id: id.to_string() })
}

// ── Complaint operations ──────────────────────────────────────────────────

/// File a new complaint. The record enters as `open`.
pub async fn file_complaint<S: RegistryStorage>(
    storage: &S,
    new: NewComplaint,
) -> Result<ComplaintRecord, RegistryError> {
    let mut snapshot = storage.begin_snapshot().await?;
    let result = file_complaint_in(storage, &mut snapshot, new).await;
    finish(storage, snapshot, result).await
}

async fn file_complaint_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    new: NewComplaint,
) -> Result<ComplaintRecord, RegistryError> {
    let mut complaints = storage.complaints(snapshot).await?;
    let id = identity::unique_id("C", |cand| complaints.iter().any(|c| c.id == cand));
    let record = ComplaintRecord {
        id,
        worker_id: new.worker_id,
        complaint_type: new.complaint_type,
        description: new.description,
        complainant_name: new.complainant_name,
        complainant_type: new.complainant_type,
        complainant_contact: new.complainant_contact,
        against_name: new.against_name,
        against_role: new.against_role,
        status: ComplaintStatus::Open,
        resolution_notes: None,
        created_at: dates::now_rfc3339(),
        resolved_at: None,
    };
    complaints.push(record.clone());
    storage.put_complaints(snapshot, complaints).await?;
    Ok(record)
}

/// Complaint statuses only move forward; resolved and closed are terminal.
fn complaint_transition_allowed(from: ComplaintStatus, to: ComplaintStatus) -> bool {
    use ComplaintStatus::*;
    matches!(
        (from, to),
        (Open, InReview) | (Open, Closed) | (InReview, Resolved) | (InReview, Closed)
    )
}

/// Move a complaint to a new status, optionally recording resolution notes.
pub async fn update_complaint_status<S: RegistryStorage>(
    storage: &S,
    id: &str,
    new_status: ComplaintStatus,
    resolution_notes: Option<String>,
) -> Result<ComplaintRecord, RegistryError> {
    let mut snapshot = storage.begin_snapshot().await?;
    let result =
        update_complaint_in(storage, &mut snapshot, id, new_status, resolution_notes).await;
    finish(storage, snapshot, result).await
}

async fn update_complaint_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    id: &str,
    new_status: ComplaintStatus,
    resolution_notes: Option<String>,
) -> Result<ComplaintRecord, RegistryError> {
    let mut complaints = storage.complaints(snapshot).await?;
    let idx = complaints
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| RegistryError::ComplaintNotFound { id: id.to_string() })?;

    let complaint = &mut complaints[idx];
    if !complaint_transition_allowed(complaint.status, new_status) {
        return Err(RegistryError::InvalidStatusChange {
            from: complaint.status,
            to: new_status,
        });
    }

    complaint.status = new_status;
    if let Some(notes) = resolution_notes {
        complaint.resolution_notes = Some(notes);
    }
    if matches!(
        new_status,
        ComplaintStatus::Resolved | ComplaintStatus::Closed
    ) {
        complaint.resolved_at = Some(dates::now_rfc3339());
    }
    let updated = complaint.clone();

    storage.put_complaints(snapshot, complaints).await?;
    Ok(updated)
}

// ── Renewal operations (admin channel) ────────────────────────────────────

/// File a renewal request for an approved worker. Snapshots the worker's
/// current validity window; enters the queue as `pending`.
pub async fn request_renewal<S: RegistryStorage>(
    storage: &S,
    worker_id: &str,
) -> Result<RenewalRecord, RegistryError> {
    let mut snapshot = storage.begin_snapshot().await?;
    let result = request_renewal_in(storage, &mut snapshot, worker_id).await;
    finish(storage, snapshot, result).await
}

async fn request_renewal_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    worker_id: &str,
) -> Result<RenewalRecord, RegistryError> {
    let workers = storage.workers(snapshot).await?;
    let idx = find_worker(&workers, worker_id)?;
    let worker = &workers[idx];
    if worker.status != WorkerStatus::Approved {
        return Err(RegistryError::NotApproved {
            id: worker_id.to_string(),
            status: worker.status,
        });
    }

    let mut renewals = storage.renewals(snapshot).await?;
    let id = identity::unique_id("R", |cand| renewals.iter().any(|r| r.id == cand));
    let record = RenewalRecord {
        id,
        worker_id: worker.id.clone(),
        registration_number: worker.registration_number.clone(),
        channel: RenewalChannel::Admin,
        current_valid_from: worker.stay_valid_from.clone(),
        current_valid_until: worker.stay_valid_until.clone(),
        new_valid_from: None,
        new_valid_until: None,
        status: RenewalStatus::Pending,
        rejection_reason: None,
        biometric_verified: false,
        requested_at: dates::now_rfc3339(),
        processed_at: None,
    };
    renewals.push(record.clone());
    storage.put_renewals(snapshot, renewals).await?;
    Ok(record)
}

/// Approve a pending renewal with an explicit new validity window, and
/// write the window back onto the linked worker.
pub async fn approve_renewal<S: RegistryStorage>(
    storage: &S,
    id: &str,
    new_valid_from: &str,
    new_valid_until: &str,
) -> Result<RenewalRecord, RegistryError> {
    let from = dates::parse_date(new_valid_from).ok_or_else(|| RegistryError::InvalidDate {
        value: new_valid_from.to_string(),
    })?;
    let until = dates::parse_date(new_valid_until).ok_or_else(|| RegistryError::InvalidDate {
        value: new_valid_until.to_string(),
    })?;
    if until <= from {
        return Err(RegistryError::InvalidValidityWindow {
            from: new_valid_from.to_string(),
            until: new_valid_until.to_string(),
        });
    }

    let mut snapshot = storage.begin_snapshot().await?;
    let result = approve_renewal_in(
        storage,
        &mut snapshot,
        id,
        dates::format_date(from),
        dates::format_date(until),
    )
    .await;
    finish(storage, snapshot, result).await
}

async fn approve_renewal_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    id: &str,
    new_from: String,
    new_until: String,
) -> Result<RenewalRecord, RegistryError> {
    let mut renewals = storage.renewals(snapshot).await?;
    let idx = find_renewal(&renewals, id)?;
    if renewals[idx].status != RenewalStatus::Pending {
        return Err(RegistryError::RenewalProcessed { id: id.to_string() });
    }

    let now = dates::now_rfc3339();
    let renewal = &mut renewals[idx];
    renewal.status = RenewalStatus::Approved;
    renewal.new_valid_from = Some(new_from.clone());
    renewal.new_valid_until = Some(new_until.clone());
    renewal.processed_at = Some(now.clone());
    let approved = renewal.clone();

    // The new window becomes the worker's stay validity.
    let mut workers = storage.workers(snapshot).await?;
    let widx = find_worker(&workers, &approved.worker_id)?;
    let worker = &mut workers[widx];
    worker.stay_valid_from = Some(new_from);
    worker.stay_valid_until = Some(new_until);
    worker.updated_at = now;

    storage.put_renewals(snapshot, renewals).await?;
    storage.put_workers(snapshot, workers).await?;
    Ok(approved)
}

/// Reject a pending renewal. Requires a non-empty reason.
pub async fn reject_renewal<S: RegistryStorage>(
    storage: &S,
    id: &str,
    reason: &str,
) -> Result<RenewalRecord, RegistryError> {
    let reason = require_reason(reason)?;
    let mut snapshot = storage.begin_snapshot().await?;
    let result = reject_renewal_in(storage, &mut snapshot, id, reason).await;
    finish(storage, snapshot, result).await
}

async fn reject_renewal_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    id: &str,
    reason: String,
) -> Result<RenewalRecord, RegistryError> {
    let mut renewals = storage.renewals(snapshot).await?;
    let idx = find_renewal(&renewals, id)?;
    if renewals[idx].status != RenewalStatus::Pending {
        return Err(RegistryError::RenewalProcessed { id: id.to_string() });
    }

    let renewal = &mut renewals[idx];
    renewal.status = RenewalStatus::Rejected;
    renewal.rejection_reason = Some(reason);
    renewal.processed_at = Some(dates::now_rfc3339());
    let rejected = renewal.clone();

    storage.put_renewals(snapshot, renewals).await?;
    Ok(rejected)
}

fn find_renewal(renewals: &[RenewalRecord], id: &str) -> Result<usize, RegistryError> {
    renewals
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| RegistryError::RenewalNotFound { id: id.to_string() })
}

// ── Kiosk (e-sevai) operations ────────────────────────────────────────────

/// Kiosk search: look up an approved worker by registration number.
///
/// An unknown number is a normal outcome (`Ok(None)`), surfaced to the
/// kiosk operator as "not found", never an internal error.
pub async fn find_by_registration_number<S: RegistryStorage>(
    storage: &S,
    registration_number: &str,
) -> Result<Option<WorkerRecord>, RegistryError> {
    let workers = storage.list_workers().await?;
    Ok(workers.into_iter().find(|w| {
        w.status == WorkerStatus::Approved
            && w.registration_number.as_deref() == Some(registration_number)
    }))
}

/// Mark a worker's biometric as verified. Kiosk-only side effect; the
/// worker must already be approved.
pub async fn verify_biometric<S: RegistryStorage>(
    storage: &S,
    worker_id: &str,
) -> Result<WorkerRecord, RegistryError> {
    let mut snapshot = storage.begin_snapshot().await?;
    let result = verify_biometric_in(storage, &mut snapshot, worker_id).await;
    finish(storage, snapshot, result).await
}

async fn verify_biometric_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    worker_id: &str,
) -> Result<WorkerRecord, RegistryError> {
    let mut workers = storage.workers(snapshot).await?;
    let idx = find_worker(&workers, worker_id)?;
    if workers[idx].status != WorkerStatus::Approved {
        return Err(RegistryError::NotApproved {
            id: worker_id.to_string(),
            status: workers[idx].status,
        });
    }

    let worker = &mut workers[idx];
    worker.biometric.verified = true;
    worker.updated_at = dates::now_rfc3339();
    let verified = worker.clone();

    storage.put_workers(snapshot, workers).await?;
    Ok(verified)
}

/// Kiosk renewal: extend an approved, biometric-verified worker's stay
/// validity by exactly one year and append an already-approved renewal
/// record. There is no pending state on this channel.
pub async fn kiosk_renew<S: RegistryStorage>(
    storage: &S,
    registration_number: &str,
) -> Result<(WorkerRecord, RenewalRecord), RegistryError> {
    let mut snapshot = storage.begin_snapshot().await?;
    let result = kiosk_renew_in(storage, &mut snapshot, registration_number).await;
    finish(storage, snapshot, result).await
}

async fn kiosk_renew_in<S: RegistryStorage>(
    storage: &S,
    snapshot: &mut S::Snapshot,
    registration_number: &str,
) -> Result<(WorkerRecord, RenewalRecord), RegistryError> {
    let mut workers = storage.workers(snapshot).await?;
    let idx = workers
        .iter()
        .position(|w| {
            w.status == WorkerStatus::Approved
                && w.registration_number.as_deref() == Some(registration_number)
        })
        .ok_or_else(|| RegistryError::WorkerNotFound {
            id: registration_number.to_string(),
        })?;

    if !workers[idx].biometric.verified {
        return Err(RegistryError::BiometricNotVerified {
            id: workers[idx].id.clone(),
        });
    }
    let current_until =
        workers[idx]
            .stay_valid_until
            .clone()
            .ok_or_else(|| RegistryError::NoValidityWindow {
                id: workers[idx].id.clone(),
            })?;
    let until = dates::parse_date(&current_until).ok_or_else(|| RegistryError::InvalidDate {
        value: current_until.clone(),
    })?;
    let new_until = dates::format_date(dates::add_one_year(until));

    let now = dates::now_rfc3339();
    let worker = &mut workers[idx];
    let current_from = worker.stay_valid_from.clone();
    worker.stay_valid_until = Some(new_until.clone());
    worker.renewal_count += 1;
    worker.last_renewal = Some(now.clone());
    worker.updated_at = now.clone();
    let renewed = worker.clone();

    let mut renewals = storage.renewals(snapshot).await?;
    let id = identity::unique_id("R", |cand| renewals.iter().any(|r| r.id == cand));
    let record = RenewalRecord {
        id,
        worker_id: renewed.id.clone(),
        registration_number: Some(registration_number.to_string()),
        channel: RenewalChannel::Kiosk,
        current_valid_from: current_from.clone(),
        current_valid_until: Some(current_until),
        new_valid_from: current_from,
        new_valid_until: Some(new_until),
        status: RenewalStatus::Approved,
        rejection_reason: None,
        biometric_verified: true,
        requested_at: now.clone(),
        processed_at: Some(now),
    };
    renewals.push(record.clone());

    storage.put_workers(snapshot, workers).await?;
    storage.put_renewals(snapshot, renewals).await?;
    Ok((renewed, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use migsafe_storage::MemoryStorage;

    fn intake(name: &str) -> NewWorker {
        NewWorker {
            full_name: name.to_string(),
            state: "Tamil Nadu".to_string(),
            district: "Chennai".to_string(),
            job_type: "Mason".to_string(),
            stay_valid_from: Some("2026-01-01".to_string()),
            stay_valid_until: Some("2026-12-31".to_string()),
            ..Default::default()
        }
    }

    fn sample_complaint() -> NewComplaint {
        NewComplaint {
            worker_id: None,
            complaint_type: ComplaintType::WageDispute,
            description: "Two months of unpaid wages".to_string(),
            complainant_name: "S. Devi".to_string(),
            complainant_type: ComplainantType::Worker,
            complainant_contact: None,
            against_name: None,
            against_role: None,
        }
    }

    #[tokio::test]
    async fn registration_enters_pending() {
        let storage = MemoryStorage::new();
        let worker = register_worker(&storage, intake("Rajesh Kumar")).await.unwrap();

        assert_eq!(worker.status, WorkerStatus::Pending);
        assert!(worker.registration_number.is_none());
        assert!(worker.id.starts_with('W'));
        assert_eq!(worker.created_at, worker.updated_at);
    }

    #[tokio::test]
    async fn approval_assigns_registration_number_once() {
        let storage = MemoryStorage::new();
        let worker = register_worker(&storage, intake("Rajesh Kumar")).await.unwrap();
        let approved = approve_worker(&storage, &worker.id).await.unwrap();

        assert_eq!(approved.status, WorkerStatus::Approved);
        let number = approved.registration_number.as_deref().unwrap();
        assert!(crate::identity::is_registration_number(number));
        assert!(approved.approved_at.is_some());

        // A second approval attempt is a state-machine violation.
        let err = approve_worker(&storage, &worker.id).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotPending { .. }));

        // The assigned number did not change.
        let stored = get_worker(&storage, &worker.id).await.unwrap().unwrap();
        assert_eq!(stored.registration_number.as_deref(), Some(number));
    }

    #[tokio::test]
    async fn rejection_requires_reason_and_is_terminal() {
        let storage = MemoryStorage::new();
        let worker = register_worker(&storage, intake("Test Worker")).await.unwrap();

        let err = reject_worker(&storage, &worker.id, "   ").await.unwrap_err();
        assert!(matches!(err, RegistryError::EmptyReason));
        // Store unchanged after the failed reject.
        let stored = get_worker(&storage, &worker.id).await.unwrap().unwrap();
        assert_eq!(stored.status, WorkerStatus::Pending);

        let rejected = reject_worker(&storage, &worker.id, "Incomplete documents")
            .await
            .unwrap();
        assert_eq!(rejected.status, WorkerStatus::Rejected);
        assert_eq!(
            rejected.rejection_reason.as_deref(),
            Some("Incomplete documents")
        );
        assert!(rejected.registration_number.is_none());

        // Rejected is terminal: neither approve nor re-reject applies.
        assert!(matches!(
            approve_worker(&storage, &worker.id).await.unwrap_err(),
            RegistryError::NotPending { .. }
        ));
    }

    #[tokio::test]
    async fn risk_flag_round_trip_restores_state() {
        let storage = MemoryStorage::new();
        let original = register_worker(&storage, intake("Flagged Worker")).await.unwrap();

        let flagged = set_risk_flag(&storage, &original.id, "Document mismatch")
            .await
            .unwrap();
        assert!(flagged.has_risk_flag);
        assert_eq!(flagged.risk_flag_reason.as_deref(), Some("Document mismatch"));
        assert!(flagged.risk_flag_date.is_some());
        assert_eq!(flagged.status, original.status);

        let cleared = clear_risk_flag(&storage, &original.id).await.unwrap();
        assert!(!cleared.has_risk_flag);
        assert!(cleared.risk_flag_reason.is_none());
        assert!(cleared.risk_flag_date.is_none());
        // Identical to the original apart from updated_at.
        let mut expected = original.clone();
        expected.updated_at = cleared.updated_at.clone();
        assert_eq!(cleared, expected);
    }

    #[tokio::test]
    async fn flagging_requires_reason_but_applies_to_any_status() {
        let storage = MemoryStorage::new();
        let worker = register_worker(&storage, intake("Any Status")).await.unwrap();
        reject_worker(&storage, &worker.id, "duplicate record")
            .await
            .unwrap();

        assert!(matches!(
            set_risk_flag(&storage, &worker.id, "").await.unwrap_err(),
            RegistryError::EmptyReason
        ));

        // A rejected worker can still be flagged.
        let flagged = set_risk_flag(&storage, &worker.id, "identity concern")
            .await
            .unwrap();
        assert!(flagged.has_risk_flag);
        assert_eq!(flagged.status, WorkerStatus::Rejected);
    }

    #[tokio::test]
    async fn complaint_statuses_move_forward_only() {
        let storage = MemoryStorage::new();
        let complaint = file_complaint(&storage, sample_complaint()).await.unwrap();
        assert_eq!(complaint.status, ComplaintStatus::Open);

        // open -> resolved skips review.
        assert!(matches!(
            update_complaint_status(&storage, &complaint.id, ComplaintStatus::Resolved, None)
                .await
                .unwrap_err(),
            RegistryError::InvalidStatusChange { .. }
        ));

        let reviewed =
            update_complaint_status(&storage, &complaint.id, ComplaintStatus::InReview, None)
                .await
                .unwrap();
        assert_eq!(reviewed.status, ComplaintStatus::InReview);
        assert!(reviewed.resolved_at.is_none());

        let resolved = update_complaint_status(
            &storage,
            &complaint.id,
            ComplaintStatus::Resolved,
            Some("Wages recovered from employer".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(resolved.status, ComplaintStatus::Resolved);
        assert!(resolved.resolved_at.is_some());
        assert!(resolved.resolution_notes.is_some());

        // Resolved is terminal.
        assert!(matches!(
            update_complaint_status(&storage, &complaint.id, ComplaintStatus::Closed, None)
                .await
                .unwrap_err(),
            RegistryError::InvalidStatusChange { .. }
        ));
    }

    #[tokio::test]
    async fn renewal_request_requires_approved_worker() {
        let storage = MemoryStorage::new();
        let worker = register_worker(&storage, intake("Pending Worker")).await.unwrap();

        assert!(matches!(
            request_renewal(&storage, &worker.id).await.unwrap_err(),
            RegistryError::NotApproved { .. }
        ));

        approve_worker(&storage, &worker.id).await.unwrap();
        let renewal = request_renewal(&storage, &worker.id).await.unwrap();
        assert_eq!(renewal.status, RenewalStatus::Pending);
        assert_eq!(renewal.channel, RenewalChannel::Admin);
        assert_eq!(renewal.current_valid_until.as_deref(), Some("2026-12-31"));
    }

    #[tokio::test]
    async fn renewal_approval_writes_window_back_to_worker() {
        let storage = MemoryStorage::new();
        let worker = register_worker(&storage, intake("Renewing Worker")).await.unwrap();
        approve_worker(&storage, &worker.id).await.unwrap();
        let renewal = request_renewal(&storage, &worker.id).await.unwrap();

        // Inverted window is rejected before any snapshot is opened.
        assert!(matches!(
            approve_renewal(&storage, &renewal.id, "2027-12-31", "2027-01-01")
                .await
                .unwrap_err(),
            RegistryError::InvalidValidityWindow { .. }
        ));

        let approved = approve_renewal(&storage, &renewal.id, "2027-01-01", "2027-12-31")
            .await
            .unwrap();
        assert_eq!(approved.status, RenewalStatus::Approved);
        assert_eq!(approved.new_valid_until.as_deref(), Some("2027-12-31"));

        let stored = get_worker(&storage, &worker.id).await.unwrap().unwrap();
        assert_eq!(stored.stay_valid_from.as_deref(), Some("2027-01-01"));
        assert_eq!(stored.stay_valid_until.as_deref(), Some("2027-12-31"));

        // Already processed.
        assert!(matches!(
            approve_renewal(&storage, &renewal.id, "2028-01-01", "2028-12-31")
                .await
                .unwrap_err(),
            RegistryError::RenewalProcessed { .. }
        ));
    }

    #[tokio::test]
    async fn renewal_rejection_requires_reason() {
        let storage = MemoryStorage::new();
        let worker = register_worker(&storage, intake("Renewal Reject")).await.unwrap();
        approve_worker(&storage, &worker.id).await.unwrap();
        let renewal = request_renewal(&storage, &worker.id).await.unwrap();

        assert!(matches!(
            reject_renewal(&storage, &renewal.id, "").await.unwrap_err(),
            RegistryError::EmptyReason
        ));

        let rejected = reject_renewal(&storage, &renewal.id, "Expired permit")
            .await
            .unwrap();
        assert_eq!(rejected.status, RenewalStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Expired permit"));
        assert!(rejected.processed_at.is_some());
    }

    #[tokio::test]
    async fn kiosk_search_misses_pending_and_unknown_workers() {
        let storage = MemoryStorage::new();
        register_worker(&storage, intake("Still Pending")).await.unwrap();

        let miss = find_by_registration_number(&storage, "MIG1234567890123001")
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn kiosk_renewal_requires_biometric_verification() {
        let storage = MemoryStorage::new();
        let worker = register_worker(&storage, intake("Kiosk Worker")).await.unwrap();
        approve_worker(&storage, &worker.id).await.unwrap();
        let number = get_worker(&storage, &worker.id)
            .await
            .unwrap()
            .unwrap()
            .registration_number
            .unwrap();

        assert!(matches!(
            kiosk_renew(&storage, &number).await.unwrap_err(),
            RegistryError::BiometricNotVerified { .. }
        ));

        verify_biometric(&storage, &worker.id).await.unwrap();
        let (renewed, record) = kiosk_renew(&storage, &number).await.unwrap();

        // Extended by exactly one year.
        assert_eq!(renewed.stay_valid_until.as_deref(), Some("2027-12-31"));
        assert_eq!(renewed.renewal_count, 1);
        assert!(renewed.last_renewal.is_some());

        // Appended already approved, no pending state on this channel.
        assert_eq!(record.status, RenewalStatus::Approved);
        assert_eq!(record.channel, RenewalChannel::Kiosk);
        assert!(record.biometric_verified);
        assert_eq!(record.current_valid_until.as_deref(), Some("2026-12-31"));
        assert_eq!(record.new_valid_until.as_deref(), Some("2027-12-31"));
    }

    #[tokio::test]
    async fn kiosk_renewal_needs_a_window_to_extend() {
        let storage = MemoryStorage::new();
        let mut no_window = intake("No Window");
        no_window.stay_valid_from = None;
        no_window.stay_valid_until = None;
        let worker = register_worker(&storage, no_window).await.unwrap();
        approve_worker(&storage, &worker.id).await.unwrap();
        verify_biometric(&storage, &worker.id).await.unwrap();
        let number = get_worker(&storage, &worker.id)
            .await
            .unwrap()
            .unwrap()
            .registration_number
            .unwrap();

        assert!(matches!(
            kiosk_renew(&storage, &number).await.unwrap_err(),
            RegistryError::NoValidityWindow { .. }
        ));
    }
}
