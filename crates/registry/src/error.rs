use migsafe_storage::{ComplaintStatus, StorageError, WorkerStatus};

/// All errors that the lifecycle engine can report.
///
/// Validation and state-machine violations are distinct from storage
/// failures so callers can map them to user-facing messages (the original
/// portal disabled buttons or showed inline errors for these).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("worker not found: {id}")]
    WorkerNotFound { id: String },

    #[error("complaint not found: {id}")]
    ComplaintNotFound { id: String },

    #[error("renewal not found: {id}")]
    RenewalNotFound { id: String },

    /// The worker is not in `pending`, so approve/reject does not apply.
    #[error("worker {id} is {status}, not pending")]
    NotPending { id: String, status: WorkerStatus },

    /// The worker is not in `approved`, so renewal/verification does not apply.
    #[error("worker {id} is {status}, not approved")]
    NotApproved { id: String, status: WorkerStatus },

    /// The renewal request has already been processed.
    #[error("renewal {id} has already been processed")]
    RenewalProcessed { id: String },

    /// Rejecting or flagging requires a non-empty reason.
    #[error("a non-empty reason is required")]
    EmptyReason,

    /// Renewal approval requires both new validity dates.
    #[error("both new validity dates are required")]
    MissingValidityDates,

    /// The proposed validity window is inverted or empty.
    #[error("invalid validity window: {from} to {until}")]
    InvalidValidityWindow { from: String, until: String },

    /// Complaint statuses only move forward (open -> in_review -> resolved/closed).
    #[error("complaint cannot move from {from} to {to}")]
    InvalidStatusChange {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    /// Kiosk renewal requires a completed biometric verification.
    #[error("worker {id} has not passed biometric verification")]
    BiometricNotVerified { id: String },

    /// The worker has no stay-validity window to extend.
    #[error("worker {id} has no stay validity window")]
    NoValidityWindow { id: String },

    #[error("invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
