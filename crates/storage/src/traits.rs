use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{ComplaintRecord, RenewalRecord, WorkerRecord};

/// The storage port for the worker registry.
///
/// A `RegistryStorage` implementation persists three ordered collections
/// (workers, complaints, renewals) as whole JSON arrays. Collections are
/// always rewritten in full; there is no row-level update.
///
/// ## Snapshot semantics
///
/// All mutating operations happen inside a snapshot, a single-writer
/// transaction over the whole store:
///
/// 1. `begin_snapshot()` — acquires the writer and returns a `Snapshot`
/// 2. Read collections with `workers`/`complaints`/`renewals`, stage
///    replacements with the matching `put_*` method
/// 3. `commit_snapshot(snapshot)` — publish all staged collections at once
///    OR `abort_snapshot(snapshot)` — discard them
///
/// Dropping a `Snapshot` without committing discards its staged writes.
/// Because `begin_snapshot` holds the writer exclusively until commit or
/// abort, two concurrent read-modify-write cycles cannot lose updates.
///
/// ## Thread safety
///
/// Implementations must be `Send + Sync + 'static` so they can live in
/// axum application state and cross async task boundaries.
#[async_trait]
pub trait RegistryStorage: Send + Sync + 'static {
    /// The snapshot (transaction) type used by this backend.
    ///
    /// Must be `Send` to allow passing across async task boundaries.
    type Snapshot: Send;

    // ── Snapshot lifecycle ────────────────────────────────────────────────────

    /// Begin a new snapshot, blocking until the writer slot is free.
    async fn begin_snapshot(&self) -> Result<Self::Snapshot, StorageError>;

    /// Commit a snapshot, making all staged collection writes durable.
    async fn commit_snapshot(&self, snapshot: Self::Snapshot) -> Result<(), StorageError>;

    /// Abort a snapshot, discarding all staged collection writes.
    async fn abort_snapshot(&self, snapshot: Self::Snapshot) -> Result<(), StorageError>;

    // ── Collection access (within snapshot) ──────────────────────────────────

    /// Read the worker collection as staged in this snapshot.
    async fn workers(
        &self,
        snapshot: &mut Self::Snapshot,
    ) -> Result<Vec<WorkerRecord>, StorageError>;

    /// Stage a whole-collection replacement of the worker collection.
    async fn put_workers(
        &self,
        snapshot: &mut Self::Snapshot,
        workers: Vec<WorkerRecord>,
    ) -> Result<(), StorageError>;

    /// Read the complaint collection as staged in this snapshot.
    async fn complaints(
        &self,
        snapshot: &mut Self::Snapshot,
    ) -> Result<Vec<ComplaintRecord>, StorageError>;

    /// Stage a whole-collection replacement of the complaint collection.
    async fn put_complaints(
        &self,
        snapshot: &mut Self::Snapshot,
        complaints: Vec<ComplaintRecord>,
    ) -> Result<(), StorageError>;

    /// Read the renewal collection as staged in this snapshot.
    async fn renewals(
        &self,
        snapshot: &mut Self::Snapshot,
    ) -> Result<Vec<RenewalRecord>, StorageError>;

    /// Stage a whole-collection replacement of the renewal collection.
    async fn put_renewals(
        &self,
        snapshot: &mut Self::Snapshot,
        renewals: Vec<RenewalRecord>,
    ) -> Result<(), StorageError>;

    // ── Read-only access (outside snapshot) ───────────────────────────────────

    /// Read the committed worker collection.
    async fn list_workers(&self) -> Result<Vec<WorkerRecord>, StorageError>;

    /// Read the committed complaint collection.
    async fn list_complaints(&self) -> Result<Vec<ComplaintRecord>, StorageError>;

    /// Read the committed renewal collection.
    async fn list_renewals(&self) -> Result<Vec<RenewalRecord>, StorageError>;
}
