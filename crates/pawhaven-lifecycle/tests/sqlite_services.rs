// SPDX-FileCopyrightText: 2026 Pawhaven Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle services over a real SQLite store.

use std::sync::Arc;

use uuid::Uuid;

use pawhaven_config::PawhavenConfig;
use pawhaven_config::model::{ApprovalMode, PetDeletePolicy};
use pawhaven_core::{
    ApplicationStatus, ListingStatus, PawhavenError, ReportKind, ReportStatus, Session,
    StorageAdapter,
};
use pawhaven_lifecycle::{ListingFilter, PetFilter, ReportFilter, Services};
use pawhaven_test_utils::{TempSqlite, fixtures};

fn services(store: &TempSqlite, configure: impl FnOnce(&mut PawhavenConfig)) -> Services {
    let mut config = PawhavenConfig::default();
    configure(&mut config);
    let storage: Arc<dyn StorageAdapter> = store.storage.clone();
    Services::new(storage, &config)
}

#[tokio::test]
async fn atomic_approval_commits_both_writes() {
    let store = TempSqlite::new().await.unwrap();
    let services = services(&store, |_| {});
    let admin = Session::admin(Uuid::new_v4());
    let user = Session::user(Uuid::new_v4());

    let pet = services
        .listings
        .add_pet(&admin, fixtures::pet_fields("Luna"))
        .await
        .unwrap();
    let application = services
        .adoption
        .submit_application(&user, pet.id, fixtures::application())
        .await
        .unwrap();

    services
        .adoption
        .approve_application(&admin, &application.id.to_string(), &pet.id.to_string())
        .await
        .unwrap();

    let stored = store
        .storage
        .get_application(application.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ApplicationStatus::Approved);
    assert!(
        services
            .listings
            .list_available_pets(&ListingFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn atomic_approval_with_unknown_pet_changes_nothing() {
    let store = TempSqlite::new().await.unwrap();
    let services = services(&store, |_| {});
    let admin = Session::admin(Uuid::new_v4());

    let pet = services
        .listings
        .add_pet(&admin, fixtures::pet_fields("Luna"))
        .await
        .unwrap();
    let application = services
        .adoption
        .submit_application(&Session::user(Uuid::new_v4()), pet.id, fixtures::application())
        .await
        .unwrap();

    let err = services
        .adoption
        .approve_application(&admin, &application.id.to_string(), &Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, PawhavenError::ApplicationUpdate { .. }));

    let stored = store
        .storage
        .get_application(application.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ApplicationStatus::Pending);
}

#[tokio::test]
async fn two_step_approval_clears_its_compensation() {
    let store = TempSqlite::new().await.unwrap();
    let services = services(&store, |c| c.lifecycle.approval_mode = ApprovalMode::TwoStep);
    let admin = Session::admin(Uuid::new_v4());

    let pet = services
        .listings
        .add_pet(&admin, fixtures::pet_fields("Luna"))
        .await
        .unwrap();
    let application = services
        .adoption
        .submit_application(&Session::user(Uuid::new_v4()), pet.id, fixtures::application())
        .await
        .unwrap();
    services
        .adoption
        .approve_application(&admin, &application.id.to_string(), &pet.id.to_string())
        .await
        .unwrap();

    let pet = store.storage.get_pet(pet.id).await.unwrap().unwrap();
    assert_eq!(pet.status, ListingStatus::Unavailable);
    assert!(store.storage.list_compensations().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_policies() {
    let store = TempSqlite::new().await.unwrap();
    let admin = Session::admin(Uuid::new_v4());
    let rejecting = services(&store, |_| {});
    let cascading = services(&store, |c| {
        c.lifecycle.pet_delete_policy = PetDeletePolicy::Cascade
    });

    let pet = rejecting
        .listings
        .add_pet(&admin, fixtures::pet_fields("Luna"))
        .await
        .unwrap();
    rejecting
        .adoption
        .submit_application(&Session::user(Uuid::new_v4()), pet.id, fixtures::application())
        .await
        .unwrap();

    let err = rejecting
        .listings
        .delete_pet(&admin, pet.id)
        .await
        .unwrap_err();
    assert!(matches!(err, PawhavenError::Conflict(_)));

    cascading.listings.delete_pet(&admin, pet.id).await.unwrap();
    assert!(
        cascading
            .adoption
            .list_applications(&admin, &PetFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn reunited_listing_spans_lost_and_found() {
    let store = TempSqlite::new().await.unwrap();
    let services = services(&store, |_| {});
    let admin = Session::admin(Uuid::new_v4());
    let user = Session::user(Uuid::new_v4());

    let lost = services
        .reports
        .submit_lost_report(&user, fixtures::lost_report("Max"))
        .await
        .unwrap();
    let found = services
        .reports
        .submit_found_report(&user, fixtures::found_report("Cat"))
        .await
        .unwrap();
    for (kind, id) in [(ReportKind::Lost, lost.id), (ReportKind::Found, found.id)] {
        services
            .reports
            .set_report_status(&admin, kind, id, ReportStatus::Approved)
            .await
            .unwrap();
        services
            .reports
            .mark_reunited(&admin, kind, id, "Back home")
            .await
            .unwrap();
    }

    let reunited = services
        .reports
        .list_reunited(&ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(reunited.len(), 2);

    let cats = services
        .reports
        .list_reunited(&ReportFilter {
            pet_type: "cat".to_string(),
            ..ReportFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].id(), found.id);
}

#[tokio::test]
async fn reconciler_repairs_half_finished_approval() {
    let store = TempSqlite::new().await.unwrap();
    let services = services(&store, |_| {});
    let admin = Session::admin(Uuid::new_v4());

    let pet = services
        .listings
        .add_pet(&admin, fixtures::pet_fields("Luna"))
        .await
        .unwrap();
    let application = services
        .adoption
        .submit_application(&Session::user(Uuid::new_v4()), pet.id, fixtures::application())
        .await
        .unwrap();

    // Step one landed, step two never ran.
    store
        .storage
        .record_compensation(&pawhaven_core::types::Compensation {
            id: Uuid::new_v4(),
            application_id: application.id,
            pet_id: pet.id,
            created_at: chrono::Utc::now(),
        })
        .await
        .unwrap();
    store
        .storage
        .update_application_status(application.id, ApplicationStatus::Approved)
        .await
        .unwrap();

    let report = services.reconciler.run_once().await.unwrap();
    assert_eq!(report.repaired, 1);
    let pet = store.storage.get_pet(pet.id).await.unwrap().unwrap();
    assert_eq!(pet.status, ListingStatus::Unavailable);
}
