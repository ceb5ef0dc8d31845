//! Dashboard statistics: the counters shown on the admin landing page.

use serde::Serialize;
use time::Date;

use migsafe_storage::{
    ComplaintRecord, ComplaintStatus, RegistryStorage, RenewalRecord, RenewalStatus, WorkerRecord,
    WorkerStatus,
};

use crate::dates;
use crate::error::RegistryError;
use crate::query;

/// Window for the "expiring soon" counter, in days.
pub const EXPIRING_SOON_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_workers: usize,
    pub pending_workers: usize,
    pub approved_workers: usize,
    pub rejected_workers: usize,
    pub risk_flagged: usize,
    pub open_complaints: usize,
    pub pending_renewals: usize,
    /// Approved workers whose stay validity ends within the next 30 days.
    pub expiring_soon: usize,
}

/// Pure computation over loaded collections.
pub fn compute(
    workers: &[WorkerRecord],
    complaints: &[ComplaintRecord],
    renewals: &[RenewalRecord],
    today: Date,
) -> DashboardStats {
    let count_status =
        |status: WorkerStatus| workers.iter().filter(|w| w.status == status).count();
    DashboardStats {
        total_workers: workers.len(),
        pending_workers: count_status(WorkerStatus::Pending),
        approved_workers: count_status(WorkerStatus::Approved),
        rejected_workers: count_status(WorkerStatus::Rejected),
        risk_flagged: workers.iter().filter(|w| w.has_risk_flag).count(),
        open_complaints: complaints
            .iter()
            .filter(|c| c.status == ComplaintStatus::Open)
            .count(),
        pending_renewals: renewals
            .iter()
            .filter(|r| r.status == RenewalStatus::Pending)
            .count(),
        expiring_soon: query::expiring_within(workers.to_vec(), EXPIRING_SOON_DAYS, today).len(),
    }
}

/// Load all three collections and compute the dashboard counters.
pub async fn dashboard_stats<S: RegistryStorage>(
    storage: &S,
) -> Result<DashboardStats, RegistryError> {
    let workers = storage.list_workers().await?;
    let complaints = storage.list_complaints().await?;
    let renewals = storage.list_renewals().await?;
    Ok(compute(&workers, &complaints, &renewals, dates::today_utc()))
}
