//! Special-code workflow against in-memory collaborators

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use eventadmin_core::codes::AssigneeRequest;
use eventadmin_core::environment::Clock;
use eventadmin_core::i18n::ContentLanguage;
use eventadmin_core::{AdminError, CategoryId, SpecialCodeId};
use eventadmin_testing::{init_test_tracing, RecordingNotifier, TestBackend};

const EVENT: &str = "rustconf";

fn restricted() -> CategoryId {
    CategoryId(1)
}

#[tokio::test]
async fn pinned_and_auto_assigned_codes_are_sent() {
    init_test_tracing();
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A", "B"]);
    let manager = backend.code_manager();

    let batch = vec![
        AssigneeRequest::unpinned("X", "x@y.com"),
        AssigneeRequest::pinned("B", "Z", "z@w.com"),
    ];
    let linked = manager
        .link_assignee_to_code(batch, EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap();
    assert_eq!(linked[0].code.as_deref(), Some("B"));
    assert_eq!(linked[0].email, "z@w.com");
    assert_eq!(linked[1].code.as_deref(), Some("A"));
    assert_eq!(linked[1].email, "x@y.com");

    let sent = manager
        .send_code_to_assignee(linked, EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap();
    assert!(sent);

    let a = backend.codes.find_by_code("A").unwrap().recipient.unwrap();
    assert_eq!(a.email, "x@y.com");
    let b = backend.codes.find_by_code("B").unwrap().recipient.unwrap();
    assert_eq!(b.email, "z@w.com");

    let messages = backend.notifier.sent();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].to, "z@w.com");
    assert_eq!(messages[0].subject, "Your code for RustConf 2026");
    assert!(messages[0].body.contains("https://tickets.example.com/event/rustconf"));
}

#[tokio::test]
async fn sent_timestamp_uses_event_time_zone() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A"]);
    let manager = backend.code_manager();

    let batch = vec![AssigneeRequest::pinned("A", "  Ann  ", " ann@example.com ")];
    manager
        .send_code_to_assignee(batch, EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap();

    let recipient = backend.codes.find_by_code("A").unwrap().recipient.unwrap();
    assert_eq!(recipient.name, "Ann");
    assert_eq!(recipient.email, "ann@example.com");
    // 10:00 UTC in Zurich, winter time
    assert_eq!(recipient.sent_at.offset().local_minus_utc(), 3600);
    assert_eq!(recipient.sent_at.to_utc(), backend.clock.now());
}

#[tokio::test]
async fn assignee_language_selects_subject_and_is_recorded() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A", "B"]);
    let manager = backend.code_manager();

    let batch = vec![
        AssigneeRequest::pinned("A", "Ann", "ann@example.com").with_language("it-IT"),
        AssigneeRequest::pinned("B", "Bob", "bob@example.com").with_language("???"),
    ];
    manager
        .send_code_to_assignee(batch, EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap();

    let messages = backend.notifier.sent();
    assert_eq!(messages[0].subject, "Il tuo codice per RustConf 2026");
    assert!(messages[0].body.starts_with("Ciao Ann,"));
    assert_eq!(messages[1].subject, "Your code for RustConf 2026");

    let a = backend.codes.find_by_code("A").unwrap().recipient.unwrap();
    assert_eq!(a.language.as_deref(), Some("it"));
}

#[tokio::test]
async fn default_language_is_first_enabled_when_english_is_off() {
    let mut backend = TestBackend::new();
    backend.event.locales = ContentLanguage::mask(&[ContentLanguage::German, ContentLanguage::French]);
    backend.events.insert_event(backend.event.clone());
    backend.codes.add_codes(restricted(), &["A"]);

    backend
        .code_manager()
        .send_code_to_assignee(
            vec![AssigneeRequest::pinned("A", "Ann", "ann@example.com")],
            EVENT,
            restricted(),
            &TestBackend::owner(),
        )
        .await
        .unwrap();

    assert_eq!(backend.notifier.sent()[0].subject, "Ihr Code für RustConf 2026");
}

#[tokio::test]
async fn duplicate_pinned_code_mutates_nothing() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A", "B"]);
    let manager = backend.code_manager();

    let batch = vec![
        AssigneeRequest::pinned("A", "One", "1@x.com"),
        AssigneeRequest::pinned("A", "Two", "2@x.com"),
    ];
    let err = manager
        .send_code_to_assignee(batch, EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::DuplicateCodeRequest);
    assert!(backend.notifier.sent().is_empty());
    assert!(backend.codes.codes().iter().all(|c| c.recipient.is_none()));
}

#[tokio::test]
async fn more_requests_than_codes_is_rejected() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A"]);

    let batch = vec![
        AssigneeRequest::unpinned("One", "1@x.com"),
        AssigneeRequest::unpinned("Two", "2@x.com"),
    ];
    let err = backend
        .code_manager()
        .link_assignee_to_code(batch, EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AdminError::InsufficientCodes {
            requested: 2,
            available: 1
        }
    );
}

#[tokio::test]
async fn identical_requests_collapse_before_counting() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A"]);

    let request = AssigneeRequest::unpinned("One", "1@x.com");
    let linked = backend
        .code_manager()
        .link_assignee_to_code(
            vec![request.clone(), request],
            EVENT,
            restricted(),
            &TestBackend::owner(),
        )
        .await
        .unwrap();
    assert_eq!(linked.len(), 1);
}

#[tokio::test]
async fn sending_requires_every_code() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A", "B"]);

    let batch = vec![
        AssigneeRequest::pinned("A", "One", "1@x.com"),
        AssigneeRequest::unpinned("Two", "2@x.com"),
    ];
    let err = backend
        .code_manager()
        .send_code_to_assignee(batch, EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::MissingCode);
    assert!(backend.notifier.sent().is_empty());
}

#[tokio::test]
async fn consumed_pinned_code_is_rejected() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A", "B"]);
    let manager = backend.code_manager();

    manager
        .send_code_to_assignee(
            vec![AssigneeRequest::pinned("A", "One", "1@x.com")],
            EVENT,
            restricted(),
            &TestBackend::owner(),
        )
        .await
        .unwrap();

    let err = manager
        .send_code_to_assignee(
            vec![AssigneeRequest::pinned("A", "Two", "2@x.com")],
            EVENT,
            restricted(),
            &TestBackend::owner(),
        )
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::UnknownOrConsumedCode);
}

#[tokio::test]
async fn blank_pin_does_not_give_a_second_code() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A", "B"]);
    let manager = backend.code_manager();

    let batch = vec![
        AssigneeRequest::unpinned("Ann", "ann@x.com"),
        AssigneeRequest::pinned("  ", "Ann", "ann@x.com"),
    ];
    let err = manager
        .link_assignee_to_code(batch.clone(), EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::UnknownOrConsumedCode);

    let err = manager
        .send_code_to_assignee(batch, EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::UnknownOrConsumedCode);
    assert!(backend.notifier.sent().is_empty());
    assert!(backend.codes.find_by_code("A").unwrap().recipient.is_none());
    assert!(backend.codes.find_by_code("B").unwrap().recipient.is_none());
}

#[tokio::test]
async fn dispatch_is_not_transactional() {
    let backend = TestBackend::with_notifier(RecordingNotifier::failing_on(3));
    backend.codes.add_codes(restricted(), &["A", "B", "C", "D"]);

    let batch = ["A", "B", "C", "D"]
        .iter()
        .enumerate()
        .map(|(i, code)| AssigneeRequest::pinned(*code, format!("n{i}"), format!("{i}@x.com")))
        .collect();
    let err = backend
        .code_manager()
        .send_code_to_assignee(batch, EVENT, restricted(), &TestBackend::owner())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Notification(_)));

    let sent: Vec<_> = backend
        .codes
        .codes()
        .into_iter()
        .filter(|c| c.recipient.is_some())
        .map(|c| c.code)
        .collect();
    assert_eq!(sent, vec!["A", "B"]);
    assert_eq!(backend.notifier.calls(), 3);
}

#[tokio::test]
async fn multi_row_consumption_is_an_integrity_error() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A"]);
    backend.codes.force_mark_sent_rows(2);

    let err = backend
        .code_manager()
        .send_code_to_assignee(
            vec![AssigneeRequest::pinned("A", "One", "1@x.com")],
            EVENT,
            restricted(),
            &TestBackend::owner(),
        )
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::ConcurrentModification { affected: 2 });
}

#[tokio::test]
async fn lost_race_reports_consumed_code() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A"]);
    backend.codes.force_mark_sent_rows(0);

    let err = backend
        .code_manager()
        .send_code_to_assignee(
            vec![AssigneeRequest::pinned("A", "One", "1@x.com")],
            EVENT,
            restricted(),
            &TestBackend::owner(),
        )
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::UnknownOrConsumedCode);
}

#[tokio::test]
async fn event_without_languages_cannot_send() {
    let mut backend = TestBackend::new();
    backend.event.locales = 0;
    backend.events.insert_event(backend.event.clone());
    backend.codes.add_codes(restricted(), &["A"]);

    let err = backend
        .code_manager()
        .send_code_to_assignee(
            vec![AssigneeRequest::pinned("A", "One", "1@x.com")],
            EVENT,
            restricted(),
            &TestBackend::owner(),
        )
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::NoLocalesConfigured);
    assert_eq!(backend.notifier.calls(), 0);
}

#[tokio::test]
async fn authorization_is_checked_first() {
    let backend = TestBackend::new();
    backend.codes.add_codes(restricted(), &["A"]);
    let manager = backend.code_manager();

    let err = manager
        .load_sent_codes(EVENT, restricted(), &TestBackend::stranger())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::NotAuthorized { .. }));

    let err = manager
        .load_sent_codes("missing", restricted(), &TestBackend::owner())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::EventNotFound { .. }));

    let err = manager
        .load_sent_codes(EVENT, CategoryId(99), &TestBackend::owner())
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::CategoryNotFound { category_id: 99 });

    let err = manager
        .load_sent_codes(EVENT, backend.public.id, &TestBackend::owner())
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::CategoryNotRestricted { category_id: 2 });
}

#[tokio::test]
async fn cleared_code_is_no_longer_sent() {
    let backend = TestBackend::new();
    let ids = backend.codes.add_codes(restricted(), &["A", "B"]);
    let manager = backend.code_manager();
    let owner = TestBackend::owner();

    manager
        .send_code_to_assignee(
            vec![
                AssigneeRequest::pinned("A", "One", "1@x.com"),
                AssigneeRequest::pinned("B", "Two", "2@x.com"),
            ],
            EVENT,
            restricted(),
            &owner,
        )
        .await
        .unwrap();
    assert_eq!(
        manager.load_sent_codes(EVENT, restricted(), &owner).await.unwrap().len(),
        2
    );

    let cleared = manager
        .clear_recipient_data(EVENT, restricted(), ids[0], &owner)
        .await
        .unwrap();
    assert!(cleared);

    let sent = manager.load_sent_codes(EVENT, restricted(), &owner).await.unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent.iter().all(|c| c.id != ids[0]));

    // the code is assignable again
    let linked = manager
        .link_assignee_to_code(
            vec![AssigneeRequest::unpinned("Three", "3@x.com")],
            EVENT,
            restricted(),
            &owner,
        )
        .await
        .unwrap();
    assert_eq!(linked[0].code.as_deref(), Some("A"));
}

#[tokio::test]
async fn clearing_an_unsent_code_returns_false() {
    let backend = TestBackend::new();
    let ids = backend.codes.add_codes(restricted(), &["A"]);
    let before = backend.codes.codes();

    let cleared = backend
        .code_manager()
        .clear_recipient_data(EVENT, restricted(), ids[0], &TestBackend::owner())
        .await
        .unwrap();
    assert!(!cleared);
    assert_eq!(backend.codes.codes(), before);

    let cleared = backend
        .code_manager()
        .clear_recipient_data(EVENT, restricted(), SpecialCodeId(404), &TestBackend::owner())
        .await
        .unwrap();
    assert!(!cleared);
}

#[tokio::test]
async fn clearing_several_rows_is_an_integrity_error() {
    let backend = TestBackend::new();
    let ids = backend.codes.add_codes(restricted(), &["A"]);
    backend.codes.force_clear_rows(3);

    let err = backend
        .code_manager()
        .clear_recipient_data(EVENT, restricted(), ids[0], &TestBackend::owner())
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::IntegrityViolation { affected: 3 });
}
