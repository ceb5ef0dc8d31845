use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::StorageError;
use crate::record::{ComplaintRecord, RenewalRecord, WorkerRecord};
use crate::traits::RegistryStorage;

/// The three collections of the registry, held together so a snapshot
/// covers the whole store.
#[derive(Debug, Clone, Default)]
pub(crate) struct Collections {
    pub(crate) workers: Vec<WorkerRecord>,
    pub(crate) complaints: Vec<ComplaintRecord>,
    pub(crate) renewals: Vec<RenewalRecord>,
}

/// In-memory storage backend.
///
/// The reference backend, used by tests and anywhere persistence is not
/// needed. A snapshot holds the store's single writer lock plus a working
/// copy of all collections; commit publishes the working copy, abort (or
/// drop) discards it.
#[derive(Clone)]
pub struct MemoryStorage {
    state: Arc<Mutex<Collections>>,
}

pub struct MemorySnapshot {
    guard: OwnedMutexGuard<Collections>,
    work: Collections,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Collections::default())),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryStorage for MemoryStorage {
    type Snapshot = MemorySnapshot;

    async fn begin_snapshot(&self) -> Result<MemorySnapshot, StorageError> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(MemorySnapshot { guard, work })
    }

    async fn commit_snapshot(&self, mut snapshot: MemorySnapshot) -> Result<(), StorageError> {
        *snapshot.guard = snapshot.work;
        Ok(())
    }

    async fn abort_snapshot(&self, snapshot: MemorySnapshot) -> Result<(), StorageError> {
        drop(snapshot);
        Ok(())
    }

    async fn workers(
        &self,
        snapshot: &mut MemorySnapshot,
    ) -> Result<Vec<WorkerRecord>, StorageError> {
        Ok(snapshot.work.workers.clone())
    }

    async fn put_workers(
        &self,
        snapshot: &mut MemorySnapshot,
        workers: Vec<WorkerRecord>,
    ) -> Result<(), StorageError> {
        snapshot.work.workers = workers;
        Ok(())
    }

    async fn complaints(
        &self,
        snapshot: &mut MemorySnapshot,
    ) -> Result<Vec<ComplaintRecord>, StorageError> {
        Ok(snapshot.work.complaints.clone())
    }

    async fn put_complaints(
        &self,
        snapshot: &mut MemorySnapshot,
        complaints: Vec<ComplaintRecord>,
    ) -> Result<(), StorageError> {
        snapshot.work.complaints = complaints;
        Ok(())
    }

    async fn renewals(
        &self,
        snapshot: &mut MemorySnapshot,
    ) -> Result<Vec<RenewalRecord>, StorageError> {
        Ok(snapshot.work.renewals.clone())
    }

    async fn put_renewals(
        &self,
        snapshot: &mut MemorySnapshot,
        renewals: Vec<RenewalRecord>,
    ) -> Result<(), StorageError> {
        snapshot.work.renewals = renewals;
        Ok(())
    }

    async fn list_workers(&self) -> Result<Vec<WorkerRecord>, StorageError> {
        Ok(self.state.lock().await.workers.clone())
    }

    async fn list_complaints(&self) -> Result<Vec<ComplaintRecord>, StorageError> {
        Ok(self.state.lock().await.complaints.clone())
    }

    async fn list_renewals(&self) -> Result<Vec<RenewalRecord>, StorageError> {
        Ok(self.state.lock().await.renewals.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::WorkerStatus;

    fn worker(id: &str) -> WorkerRecord {
        WorkerRecord {
            id: id.to_string(),
            registration_number: None,
            full_name: format!("Worker {}", id),
            aadhaar_number: None,
            mobile_number: None,
            email: None,
            date_of_birth: None,
            gender: None,
            state: "Tamil Nadu".to_string(),
            district: "Chennai".to_string(),
            address: None,
            pincode: None,
            job_type: "Mason".to_string(),
            contractor_id: None,
            employer_name: None,
            worksite_location: None,
            stay_valid_from: None,
            stay_valid_until: None,
            status: WorkerStatus::Pending,
            rejection_reason: None,
            has_risk_flag: false,
            risk_flag_reason: None,
            risk_flag_date: None,
            biometric: Default::default(),
            renewal_count: 0,
            last_renewal: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
            approved_at: None,
        }
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let storage = MemoryStorage::new();
        let mut snap = storage.begin_snapshot().await.unwrap();
        storage
            .put_workers(&mut snap, vec![worker("w1")])
            .await
            .unwrap();
        storage.commit_snapshot(snap).await.unwrap();

        let workers = storage.list_workers().await.unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].id, "w1");
    }

    #[tokio::test]
    async fn aborted_writes_are_discarded() {
        let storage = MemoryStorage::new();
        let mut snap = storage.begin_snapshot().await.unwrap();
        storage
            .put_workers(&mut snap, vec![worker("w1")])
            .await
            .unwrap();
        storage.abort_snapshot(snap).await.unwrap();

        assert!(storage.list_workers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn snapshot_reads_see_staged_writes() {
        let storage = MemoryStorage::new();
        let mut snap = storage.begin_snapshot().await.unwrap();
        storage
            .put_workers(&mut snap, vec![worker("w1")])
            .await
            .unwrap();
        let staged = storage.workers(&mut snap).await.unwrap();
        assert_eq!(staged.len(), 1);
        storage.abort_snapshot(snap).await.unwrap();
    }

    #[tokio::test]
    async fn dropped_snapshot_discards_writes() {
        let storage = MemoryStorage::new();
        {
            let mut snap = storage.begin_snapshot().await.unwrap();
            storage
                .put_workers(&mut snap, vec![worker("w1")])
                .await
                .unwrap();
            // snap dropped here without commit
        }
        assert!(storage.list_workers().await.unwrap().is_empty());
    }
}
