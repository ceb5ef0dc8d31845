//! Query/filter layer for the list views.
//!
//! Pure functions over loaded collections: status filtering plus the
//! date-descending ordering each table uses. `None` as a status filter
//! (the `all` view) means no filtering. Records with an absent or
//! malformed sort date order as epoch zero, i.e. oldest.

use time::Date;

use migsafe_storage::{
    ComplaintRecord, ComplaintStatus, RenewalRecord, RenewalStatus, WorkerRecord, WorkerStatus,
};

use crate::dates;

/// Workers filtered by status, newest first.
///
/// The approved view orders by approval date; every other view orders by
/// creation date.
pub fn workers_by_status(
    mut workers: Vec<WorkerRecord>,
    status: Option<WorkerStatus>,
) -> Vec<WorkerRecord> {
    if let Some(status) = status {
        workers.retain(|w| w.status == status);
    }
    let by_approval = status == Some(WorkerStatus::Approved);
    workers.sort_by(|a, b| {
        let key = |w: &WorkerRecord| {
            if by_approval {
                dates::timestamp_or_epoch(w.approved_at.as_deref())
            } else {
                dates::timestamp_or_epoch(Some(w.created_at.as_str()))
            }
        };
        key(b).cmp(&key(a))
    });
    workers
}

/// Complaints filtered by status, newest first by filing date.
pub fn complaints_by_status(
    mut complaints: Vec<ComplaintRecord>,
    status: Option<ComplaintStatus>,
) -> Vec<ComplaintRecord> {
    if let Some(status) = status {
        complaints.retain(|c| c.status == status);
    }
    complaints.sort_by(|a, b| {
        dates::timestamp_or_epoch(Some(b.created_at.as_str()))
            .cmp(&dates::timestamp_or_epoch(Some(a.created_at.as_str())))
    });
    complaints
}

/// Renewals filtered by status, newest first by request date.
pub fn renewals_by_status(
    mut renewals: Vec<RenewalRecord>,
    status: Option<RenewalStatus>,
) -> Vec<RenewalRecord> {
    if let Some(status) = status {
        renewals.retain(|r| r.status == status);
    }
    renewals.sort_by(|a, b| {
        dates::timestamp_or_epoch(Some(b.requested_at.as_str()))
            .cmp(&dates::timestamp_or_epoch(Some(a.requested_at.as_str())))
    });
    renewals
}

/// Risk-flagged workers of any status, most recently flagged first.
pub fn risk_flagged(mut workers: Vec<WorkerRecord>) -> Vec<WorkerRecord> {
    workers.retain(|w| w.has_risk_flag);
    workers.sort_by(|a, b| {
        dates::timestamp_or_epoch(b.risk_flag_date.as_deref())
            .cmp(&dates::timestamp_or_epoch(a.risk_flag_date.as_deref()))
    });
    workers
}

/// Approved workers whose stay validity ends within `[today, today + days]`,
/// soonest expiry first. Workers without a parseable end date are excluded.
pub fn expiring_within(
    workers: Vec<WorkerRecord>,
    days: i64,
    today: Date,
) -> Vec<WorkerRecord> {
    let horizon = today.saturating_add(time::Duration::days(days));
    let mut expiring: Vec<(Date, WorkerRecord)> = workers
        .into_iter()
        .filter(|w| w.status == WorkerStatus::Approved)
        .filter_map(|w| {
            let until = w.stay_valid_until.as_deref().and_then(dates::parse_date)?;
            (until >= today && until <= horizon).then_some((until, w))
        })
        .collect();
    expiring.sort_by_key(|(until, _)| *until);
    expiring.into_iter().map(|(_, w)| w).collect()
}
