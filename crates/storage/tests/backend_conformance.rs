//! Backend-agnostic conformance tests for `RegistryStorage` implementations.
//!
//! Each behavior is written once, generically, and run against both the
//! in-memory and the JSON-file backend.

use migsafe_storage::{
    ComplainantType, ComplaintRecord, ComplaintStatus, ComplaintType, JsonStorage, MemoryStorage,
    RegistryStorage, WorkerRecord, WorkerStatus,
};

fn worker(id: &str, status: WorkerStatus) -> WorkerRecord {
    WorkerRecord {
        id: id.to_string(),
        registration_number: None,
        full_name: format!("Worker {}", id),
        aadhaar_number: None,
        mobile_number: None,
        email: None,
        date_of_birth: None,
        gender: None,
        state: "Odisha".to_string(),
        district: "Cuttack".to_string(),
        address: None,
        pincode: None,
        job_type: "Helper".to_string(),
        contractor_id: None,
        employer_name: None,
        worksite_location: None,
        stay_valid_from: None,
        stay_valid_until: None,
        status,
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

fn complaint(id: &str) -> ComplaintRecord {
    ComplaintRecord {
        id: id.to_string(),
        worker_id: None,
        complaint_type: ComplaintType::WageDispute,
        description: "Unpaid wages for March".to_string(),
        complainant_name: "A. Complainant".to_string(),
        complainant_type: ComplainantType::Worker,
        complainant_contact: None,
        against_name: None,
        against_role: None,
        status: ComplaintStatus::Open,
        resolution_notes: None,
        created_at: "2026-01-02T00:00:00Z".to_string(),
        resolved_at: None,
    }
}

async fn commit_makes_all_collections_visible<S: RegistryStorage>(storage: S) {
    let mut snap = storage.begin_snapshot().await.unwrap();
    storage
        .put_workers(&mut snap, vec![worker("w1", WorkerStatus::Pending)])
        .await
        .unwrap();
    storage
        .put_complaints(&mut snap, vec![complaint("c1")])
        .await
        .unwrap();
    storage.commit_snapshot(snap).await.unwrap();

    assert_eq!(storage.list_workers().await.unwrap().len(), 1);
    assert_eq!(storage.list_complaints().await.unwrap().len(), 1);
    assert!(storage.list_renewals().await.unwrap().is_empty());
}

async fn abort_discards_all_collections<S: RegistryStorage>(storage: S) {
    let mut snap = storage.begin_snapshot().await.unwrap();
    storage
        .put_workers(&mut snap, vec![worker("w1", WorkerStatus::Pending)])
        .await
        .unwrap();
    storage
        .put_complaints(&mut snap, vec![complaint("c1")])
        .await
        .unwrap();
    storage.abort_snapshot(snap).await.unwrap();

    assert!(storage.list_workers().await.unwrap().is_empty());
    assert!(storage.list_complaints().await.unwrap().is_empty());
}

async fn uncommitted_writes_invisible_to_readers<S: RegistryStorage>(storage: S) {
    let mut snap = storage.begin_snapshot().await.unwrap();
    storage
        .put_workers(&mut snap, vec![worker("w1", WorkerStatus::Pending)])
        .await
        .unwrap();

    // The snapshot is still open: committed reads must not see the write.
    // (list_* reads the committed state, not the working copy.)
    storage.abort_snapshot(snap).await.unwrap();
    assert!(storage.list_workers().await.unwrap().is_empty());
}

async fn round_trip_is_stable<S: RegistryStorage>(storage: S) {
    let original = vec![
        worker("w1", WorkerStatus::Pending),
        worker("w2", WorkerStatus::Approved),
    ];
    let mut snap = storage.begin_snapshot().await.unwrap();
    storage.put_workers(&mut snap, original.clone()).await.unwrap();
    storage.commit_snapshot(snap).await.unwrap();

    // load -> save -> load yields the identical collection.
    let mut snap = storage.begin_snapshot().await.unwrap();
    let loaded = storage.workers(&mut snap).await.unwrap();
    storage.put_workers(&mut snap, loaded).await.unwrap();
    storage.commit_snapshot(snap).await.unwrap();

    assert_eq!(storage.list_workers().await.unwrap(), original);
}

async fn sequential_snapshots_do_not_lose_updates<S: RegistryStorage>(storage: S) {
    let mut snap = storage.begin_snapshot().await.unwrap();
    storage
        .put_workers(&mut snap, vec![worker("w1", WorkerStatus::Pending)])
        .await
        .unwrap();
    storage.commit_snapshot(snap).await.unwrap();

    // A second writer appends rather than overwriting the first write.
    let mut snap = storage.begin_snapshot().await.unwrap();
    let mut workers = storage.workers(&mut snap).await.unwrap();
    workers.push(worker("w2", WorkerStatus::Pending));
    storage.put_workers(&mut snap, workers).await.unwrap();
    storage.commit_snapshot(snap).await.unwrap();

    assert_eq!(storage.list_workers().await.unwrap().len(), 2);
}

macro_rules! backend_tests {
    ($name:ident) => {
        mod $name {
            use super::*;

            #[tokio::test]
            async fn commit_makes_all_collections_visible() {
                let (storage, _guard) = make::$name();
                super::commit_makes_all_collections_visible(storage).await;
            }

            #[tokio::test]
            async fn abort_discards_all_collections() {
                let (storage, _guard) = make::$name();
                super::abort_discards_all_collections(storage).await;
            }

            #[tokio::test]
            async fn uncommitted_writes_invisible_to_readers() {
                let (storage, _guard) = make::$name();
                super::uncommitted_writes_invisible_to_readers(storage).await;
            }

            #[tokio::test]
            async fn round_trip_is_stable() {
                let (storage, _guard) = make::$name();
                super::round_trip_is_stable(storage).await;
            }

            #[tokio::test]
            async fn sequential_snapshots_do_not_lose_updates() {
                let (storage, _guard) = make::$name();
                super::sequential_snapshots_do_not_lose_updates(storage).await;
            }
        }
    };
}

mod make {
    use super::*;

    pub fn memory() -> (MemoryStorage, Option<tempfile::TempDir>) {
        (MemoryStorage::new(), None)
    }

    pub fn json() -> (JsonStorage, Option<tempfile::TempDir>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = JsonStorage::open(dir.path()).expect("open json storage");
        (storage, Some(dir))
    }
}

backend_tests!(memory);
backend_tests!(json);
