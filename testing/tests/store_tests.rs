//! Tests for the in-memory collaborators

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use chrono::Utc;
use eventadmin_core::configuration::{ConfigurationKey, ConfigurationScope};
use eventadmin_core::providers::{
    AuthorizationOracle, ConfigurationStore, Notifier, SentRecord, SpecialCodeStore,
    WaitingQueueRepository,
};
use eventadmin_core::waiting_queue::SubscriptionStatus;
use eventadmin_core::{AdminError, Caller, CategoryId};
use eventadmin_testing::fixtures::{self, TestBackend};
use eventadmin_testing::RecordingNotifier;

#[tokio::test]
async fn mark_sent_only_matches_unsent_codes() {
    let backend = TestBackend::new();
    backend.codes.add_codes(CategoryId(1), &["A", "B"]);

    let record = SentRecord {
        code: "A",
        assignee: "Ann",
        email: "ann@example.com",
        language: "en",
        sent_at: Utc::now().fixed_offset(),
    };
    assert_eq!(backend.codes.mark_sent(&record).await.unwrap(), 1);
    assert_eq!(backend.codes.mark_sent(&record).await.unwrap(), 0);

    let unsent = backend.codes.find_unsent_codes(CategoryId(1)).await.unwrap();
    assert_eq!(unsent.len(), 1);
    assert_eq!(unsent[0].code, "B");
}

#[tokio::test]
async fn clear_recipient_ignores_unsent_codes() {
    let backend = TestBackend::new();
    let ids = backend.codes.add_codes(CategoryId(1), &["A"]);
    let cleared = backend
        .codes
        .clear_recipient(ids[0], CategoryId(1))
        .await
        .unwrap();
    assert_eq!(cleared, 0);
}

#[tokio::test]
async fn event_values_override_organization_and_system() {
    let backend = TestBackend::new();
    let event = fixtures::event();
    let scope = ConfigurationScope::event(&event);
    let key = ConfigurationKey::EnableWaitingQueue;
    let store = &backend.configuration;

    assert_eq!(store.get_bool(scope, key).await.unwrap(), None);

    store.set_system(key, "true");
    assert_eq!(store.get_bool(scope, key).await.unwrap(), Some(true));

    store.set_organization(event.organization_id, key, "false");
    assert_eq!(store.get_bool(scope, key).await.unwrap(), Some(false));

    store
        .save_event_value(scope, key, "true", &Caller::new("admin"))
        .await
        .unwrap();
    assert_eq!(store.get_bool(scope, key).await.unwrap(), Some(true));
    assert_eq!(store.saved_by(), vec!["admin".to_string()]);
}

#[tokio::test]
async fn ownership_is_per_organization() {
    let backend = TestBackend::new();
    let event = fixtures::event();
    assert!(
        backend
            .authorization
            .check_ownership(&event, &TestBackend::owner(), event.organization_id)
            .await
            .is_ok()
    );
    let denied = backend
        .authorization
        .check_ownership(&event, &TestBackend::stranger(), event.organization_id)
        .await;
    assert!(matches!(denied, Err(AdminError::NotAuthorized { .. })));
}

#[tokio::test]
async fn status_update_is_conditional() {
    let backend = TestBackend::new();
    let event = fixtures::event();
    let sub = fixtures::subscription(1, &event, SubscriptionStatus::Waiting, Utc::now());
    backend.queue.insert(sub.clone());

    let moved = backend
        .queue
        .update_status(event.id, sub.id, SubscriptionStatus::Cancelled, SubscriptionStatus::Waiting)
        .await
        .unwrap();
    assert_eq!(moved, 1);

    let again = backend
        .queue
        .update_status(event.id, sub.id, SubscriptionStatus::Cancelled, SubscriptionStatus::Waiting)
        .await
        .unwrap();
    assert_eq!(again, 0);
    assert_eq!(backend.queue.count_waiting(event.id).await.unwrap(), 0);
}

#[tokio::test]
async fn failing_notifier_fails_only_the_nth_send() {
    let notifier = RecordingNotifier::failing_on(2);
    let event = fixtures::event();
    for i in 0..3 {
        let result = notifier
            .send(&event, None, &format!("{i}@example.com"), "subject", Box::new(|| Ok("body".to_string())))
            .await;
        assert_eq!(result.is_err(), i == 1);
    }
    assert_eq!(notifier.calls(), 3);
    assert_eq!(notifier.sent().len(), 2);
}
