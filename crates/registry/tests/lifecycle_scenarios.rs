//! End-to-end lifecycle scenarios over the in-memory backend, mirroring
//! how the admin dashboard and kiosk drive the registry.

use migsafe_registry::{identity, lifecycle, query, stats, NewWorker};
use migsafe_storage::{MemoryStorage, RegistryStorage, WorkerStatus};

fn intake(name: &str, job_type: &str) -> NewWorker {
    NewWorker {
        full_name: name.to_string(),
        state: "Tamil Nadu".to_string(),
        district: "Coimbatore".to_string(),
        job_type: job_type.to_string(),
        stay_valid_from: Some("2026-01-01".to_string()),
        stay_valid_until: Some("2026-12-31".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn registration_review_cycle() {
    let storage = MemoryStorage::new();

    // Register two workers; both land in the pending queue.
    let rajesh = lifecycle::register_worker(&storage, intake("Rajesh Kumar", "Mason"))
        .await
        .unwrap();
    let test_worker = lifecycle::register_worker(&storage, intake("Test Worker", "Helper"))
        .await
        .unwrap();

    let pending = query::workers_by_status(
        storage.list_workers().await.unwrap(),
        Some(WorkerStatus::Pending),
    );
    assert_eq!(pending.len(), 2);

    // Approve Rajesh: he moves to the approved view with a MIG number.
    lifecycle::approve_worker(&storage, &rajesh.id).await.unwrap();

    let approved = query::workers_by_status(
        storage.list_workers().await.unwrap(),
        Some(WorkerStatus::Approved),
    );
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].full_name, "Rajesh Kumar");
    assert!(identity::is_registration_number(
        approved[0].registration_number.as_deref().unwrap()
    ));

    let pending = query::workers_by_status(
        storage.list_workers().await.unwrap(),
        Some(WorkerStatus::Pending),
    );
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].full_name, "Test Worker");

    // Reject the other pending worker with a reason.
    lifecycle::reject_worker(&storage, &test_worker.id, "Incomplete documents")
        .await
        .unwrap();

    let rejected = query::workers_by_status(
        storage.list_workers().await.unwrap(),
        Some(WorkerStatus::Rejected),
    );
    assert_eq!(rejected.len(), 1);
    assert_eq!(
        rejected[0].rejection_reason.as_deref(),
        Some("Incomplete documents")
    );
    // A rejected worker never acquires a registration number.
    assert!(rejected[0].registration_number.is_none());

    let dashboard = stats::dashboard_stats(&storage).await.unwrap();
    assert_eq!(dashboard.total_workers, 2);
    assert_eq!(dashboard.approved_workers, 1);
    assert_eq!(dashboard.rejected_workers, 1);
    assert_eq!(dashboard.pending_workers, 0);
}

#[tokio::test]
async fn kiosk_verification_and_renewal_cycle() {
    let storage = MemoryStorage::new();

    let worker = lifecycle::register_worker(&storage, intake("Meena Devi", "Cook"))
        .await
        .unwrap();
    let approved = lifecycle::approve_worker(&storage, &worker.id).await.unwrap();
    let number = approved.registration_number.clone().unwrap();

    // Unknown registration number: a user-visible miss, not an error.
    let miss = lifecycle::find_by_registration_number(&storage, "MIG0000000000000000")
        .await
        .unwrap();
    assert!(miss.is_none());

    // Known number resolves to the approved worker.
    let hit = lifecycle::find_by_registration_number(&storage, &number)
        .await
        .unwrap()
        .expect("approved worker should be findable");
    assert_eq!(hit.id, worker.id);
    assert!(!hit.biometric.verified);

    // Verify, then renew twice: each renewal extends by exactly one year.
    lifecycle::verify_biometric(&storage, &worker.id).await.unwrap();
    let (renewed, _) = lifecycle::kiosk_renew(&storage, &number).await.unwrap();
    assert_eq!(renewed.stay_valid_until.as_deref(), Some("2027-12-31"));
    let (renewed, _) = lifecycle::kiosk_renew(&storage, &number).await.unwrap();
    assert_eq!(renewed.stay_valid_until.as_deref(), Some("2028-12-31"));
    assert_eq!(renewed.renewal_count, 2);

    let renewals = storage.list_renewals().await.unwrap();
    assert_eq!(renewals.len(), 2);
}

#[tokio::test]
async fn failed_actions_leave_the_store_unchanged() {
    let storage = MemoryStorage::new();
    let worker = lifecycle::register_worker(&storage, intake("Unchanged", "Welder"))
        .await
        .unwrap();
    let before = storage.list_workers().await.unwrap();

    // Each of these aborts its snapshot.
    assert!(lifecycle::reject_worker(&storage, &worker.id, "").await.is_err());
    assert!(lifecycle::set_risk_flag(&storage, &worker.id, " ").await.is_err());
    assert!(lifecycle::approve_worker(&storage, "W-missing").await.is_err());
    assert!(lifecycle::request_renewal(&storage, &worker.id).await.is_err());

    assert_eq!(storage.list_workers().await.unwrap(), before);
    assert!(storage.list_renewals().await.unwrap().is_empty());
}
