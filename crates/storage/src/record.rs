use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Approval status of a worker registration.
///
/// Exactly one status holds at any time. `rejected` is terminal for a
/// registration; re-registration creates a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Pending,
    Approved,
    Rejected,
}

impl WorkerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerStatus::Pending => "pending",
            WorkerStatus::Approved => "approved",
            WorkerStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WorkerStatus::Pending),
            "approved" => Ok(WorkerStatus::Approved),
            "rejected" => Ok(WorkerStatus::Rejected),
            other => Err(format!("unknown worker status '{}'", other)),
        }
    }
}

/// Processing status of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    InReview,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "open",
            ComplaintStatus::InReview => "in_review",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(ComplaintStatus::Open),
            "in_review" => Ok(ComplaintStatus::InReview),
            "resolved" => Ok(ComplaintStatus::Resolved),
            "closed" => Ok(ComplaintStatus::Closed),
            other => Err(format!("unknown complaint status '{}'", other)),
        }
    }
}

/// Processing status of a renewal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStatus {
    Pending,
    Approved,
    Rejected,
}

impl RenewalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalStatus::Pending => "pending",
            RenewalStatus::Approved => "approved",
            RenewalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RenewalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenewalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RenewalStatus::Pending),
            "approved" => Ok(RenewalStatus::Approved),
            "rejected" => Ok(RenewalStatus::Rejected),
            other => Err(format!("unknown renewal status '{}'", other)),
        }
    }
}

/// Category of a filed complaint (closed enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintType {
    WageDispute,
    Harassment,
    MissingPerson,
    WorkplaceAccident,
    DeathCase,
    Other,
}

impl ComplaintType {
    /// Human-readable label, as shown on the complaints dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            ComplaintType::WageDispute => "Wage Dispute",
            ComplaintType::Harassment => "Harassment / Abuse",
            ComplaintType::MissingPerson => "Missing Person",
            ComplaintType::WorkplaceAccident => "Workplace Accident",
            ComplaintType::DeathCase => "Death Case Escalation",
            ComplaintType::Other => "Other",
        }
    }
}

/// Who filed the complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplainantType {
    Worker,
    Manager,
    Employer,
    Family,
    Other,
}

/// Which surface a renewal request came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalChannel {
    /// Admin dashboard: request is created pending and reviewed later.
    Admin,
    /// E-sevai kiosk: biometric-gated, appended already approved.
    Kiosk,
}

impl RenewalChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalChannel::Admin => "admin",
            RenewalChannel::Kiosk => "kiosk",
        }
    }
}

impl fmt::Display for RenewalChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Biometric capture state for a worker.
///
/// `verified` is set only by the kiosk verification flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricRecord {
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub facial_scan: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

/// A registered migrant worker.
///
/// This is the single canonical worker shape: it unifies the admin
/// registration fields with the kiosk biometric sub-record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Locally unique record id, assigned at registration.
    pub id: String,
    /// Assigned exactly once, at the pending -> approved transition.
    /// Format: `MIG<millis><3-digit suffix>`.
    #[serde(default)]
    pub registration_number: Option<String>,

    pub full_name: String,
    #[serde(default)]
    pub aadhaar_number: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// `YYYY-MM-DD`.
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

    /// Stay validity window start, `YYYY-MM-DD`.
    #[serde(default)]
    pub stay_valid_from: Option<String>,
    /// Stay validity window end, `YYYY-MM-DD`. Renewal extends this.
    #[serde(default)]
    pub stay_valid_until: Option<String>,

    pub status: WorkerStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,

    /// Risk flag is orthogonal to status: an approved or rejected worker
    /// may still be flagged.
    #[serde(default)]
    pub has_risk_flag: bool,
    #[serde(default)]
    pub risk_flag_reason: Option<String>,
    /// ISO 8601 / RFC 3339 timestamp string.
    #[serde(default)]
    pub risk_flag_date: Option<String>,

    #[serde(default)]
    pub biometric: BiometricRecord,

    #[serde(default)]
    pub renewal_count: u32,
    /// ISO 8601 / RFC 3339 timestamp string.
    #[serde(default)]
    pub last_renewal: Option<String>,

    /// ISO 8601 / RFC 3339 timestamp string. Immutable once set.
    pub created_at: String,
    /// ISO 8601 / RFC 3339 timestamp string. Refreshed on every mutation.
    pub updated_at: String,
    /// ISO 8601 / RFC 3339 timestamp string.
    #[serde(default)]
    pub approved_at: Option<String>,
}

/// A filed complaint, optionally linked to a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub id: String,
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
    pub status: ComplaintStatus,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub created_at: String,
    /// ISO 8601 / RFC 3339 timestamp string.
    #[serde(default)]
    pub resolved_at: Option<String>,
}

/// A stay-validity renewal request.
///
/// Single shape for both channels: admin requests go through a pending
/// review, kiosk renewals are appended already approved with
/// `biometric_verified` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalRecord {
    pub id: String,
    pub worker_id: String,
    #[serde(default)]
    pub registration_number: Option<String>,
    pub channel: RenewalChannel,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub current_valid_from: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub current_valid_until: Option<String>,
    /// `YYYY-MM-DD`. Set only at approval.
    #[serde(default)]
    pub new_valid_from: Option<String>,
    /// `YYYY-MM-DD`. Set only at approval.
    #[serde(default)]
    pub new_valid_until: Option<String>,
    pub status: RenewalStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub biometric_verified: bool,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub requested_at: String,
    /// ISO 8601 / RFC 3339 timestamp string.
    #[serde(default)]
    pub processed_at: Option<String>,
}
