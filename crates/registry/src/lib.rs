//! Worker registration lifecycle engine.
//!
//! Implements the registry's state machine over any [`RegistryStorage`]
//! backend: registration intake, approval with registration-number
//! assignment, rejection, risk flagging, complaint handling, stay-validity
//! renewals (admin review and biometric-gated kiosk extension), plus the
//! query layer and dashboard statistics used by the list views.
//!
//! Every mutation runs as a single storage snapshot: read the collection,
//! validate, rewrite, commit. Any failure aborts the snapshot and leaves
//! the store unchanged.

pub mod dates;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod query;
pub mod stats;

pub use error::RegistryError;
pub use lifecycle::{NewComplaint, NewWorker};
pub use stats::DashboardStats;

pub use migsafe_storage::RegistryStorage;
