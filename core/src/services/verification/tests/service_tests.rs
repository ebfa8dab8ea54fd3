//! Unit tests for verification service

use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::domain::entities::verification_record::CODE_LENGTH;
use crate::errors::DomainError;
use crate::services::clock::{SimulatedTimeProvider, TimeProvider};
use crate::services::verification::{VerificationService, VerificationServiceConfig};

use super::mocks::{MockNotifier, MockRecordStore};

const EMAIL: &str = "alice@example.com";
const KEY: &str = "email_verifications:alice@example.com";

struct Harness {
    service: VerificationService<MockRecordStore, MockNotifier>,
    store: Arc<MockRecordStore>,
    notifier: Arc<MockNotifier>,
    clock: SimulatedTimeProvider,
}

fn harness_with(
    store: MockRecordStore,
    notifier: MockNotifier,
    config: VerificationServiceConfig,
) -> Harness {
    let store = Arc::new(store);
    let notifier = Arc::new(notifier);
    let clock = SimulatedTimeProvider::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    let service = VerificationService::with_clock(
        store.clone(),
        notifier.clone(),
        config,
        Arc::new(clock.clone()),
    );
    Harness {
        service,
        store,
        notifier,
        clock,
    }
}

fn harness() -> Harness {
    harness_with(
        MockRecordStore::new(),
        MockNotifier::new(),
        VerificationServiceConfig::default(),
    )
}

fn other_code(code: &str) -> String {
    if code == "000000" {
        "111111".to_string()
    } else {
        "000000".to_string()
    }
}

#[tokio::test]
async fn test_request_code_success() {
    let h = harness();

    let issued = h.service.request_code(EMAIL).await.unwrap();
    assert_eq!(issued.email, EMAIL);
    assert_eq!(issued.expires_at, h.clock.now() + Duration::minutes(10));
    assert_eq!(issued.message_id, "mock-msg-1");

    let message = h.notifier.last_message().unwrap();
    assert_eq!(message.to, EMAIL);
    assert_eq!(message.subject, "Your Budget Buddy verification code");
    assert!(message.text_body.contains("It expires in 10 minutes."));

    let code = h.notifier.last_code_for(EMAIL).unwrap();
    assert_eq!(code.len(), CODE_LENGTH);

    let document = h.store.document(KEY).unwrap();
    assert!(document.contains(&code));
}

#[tokio::test]
async fn test_request_code_normalizes_email() {
    let h = harness();

    let issued = h.service.request_code("  Alice@Example.COM ").await.unwrap();
    assert_eq!(issued.email, EMAIL);
    assert!(h.store.document(KEY).is_some());
    assert_eq!(h.notifier.last_message().unwrap().to, EMAIL);
}

#[tokio::test]
async fn test_request_code_invalid_email_does_not_touch_storage() {
    let h = harness();

    for input in ["", "   ", "not-an-email", "a@b@c", "@example.com"] {
        let err = h.service.request_code(input).await.unwrap_err();
        assert!(
            matches!(err, DomainError::InvalidArgument { .. }),
            "expected InvalidArgument for {:?}, got {:?}",
            input,
            err
        );
    }

    assert_eq!(h.store.call_count(), 0);
    assert_eq!(h.notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_confirm_code_succeeds_exactly_once() {
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let code = h.notifier.last_code_for(EMAIL).unwrap();

    assert!(h.service.confirm_code(EMAIL, &code).await.is_ok());
    assert!(h.store.document(KEY).is_none());

    let err = h.service.confirm_code(EMAIL, &code).await.unwrap_err();
    assert_eq!(err, DomainError::NotFound);
}

#[tokio::test]
async fn test_confirm_code_accepts_unnormalized_email() {
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let code = h.notifier.last_code_for(EMAIL).unwrap();

    assert!(h.service.confirm_code(" ALICE@example.com", &code).await.is_ok());
}

#[tokio::test]
async fn test_mismatch_keeps_record() {
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let code = h.notifier.last_code_for(EMAIL).unwrap();

    let err = h.service.confirm_code(EMAIL, &other_code(&code)).await.unwrap_err();
    assert_eq!(err, DomainError::CodeMismatch);
    assert!(h.store.document(KEY).is_some());

    assert!(h.service.confirm_code(EMAIL, &code).await.is_ok());
}

#[tokio::test]
async fn test_reissue_invalidates_previous_code() {
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let first = h.notifier.last_code_for(EMAIL).unwrap();

    h.clock.advance_minutes(1);
    h.service.request_code(EMAIL).await.unwrap();
    let second = h.notifier.last_code_for(EMAIL).unwrap();

    if first != second {
        let err = h.service.confirm_code(EMAIL, &first).await.unwrap_err();
        assert_eq!(err, DomainError::CodeMismatch);
    }
    assert!(h.service.confirm_code(EMAIL, &second).await.is_ok());
}

#[tokio::test]
async fn test_confirm_within_ttl_then_replay() {
    // TTL=10 min. t=0 issue; t=5 confirm succeeds; t=6 confirm is NotFound
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let code = h.notifier.last_code_for(EMAIL).unwrap();

    h.clock.advance_minutes(5);
    assert!(h.service.confirm_code(EMAIL, &code).await.is_ok());

    h.clock.advance_minutes(1);
    assert_eq!(
        h.service.confirm_code(EMAIL, &code).await.unwrap_err(),
        DomainError::NotFound
    );
}

#[tokio::test]
async fn test_expired_code_is_reaped() {
    // t=0 issue; t=11 confirm is Expired; t=12 confirm is NotFound
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let code = h.notifier.last_code_for(EMAIL).unwrap();

    h.clock.advance_minutes(11);
    assert_eq!(
        h.service.confirm_code(EMAIL, &code).await.unwrap_err(),
        DomainError::Expired
    );
    assert!(h.store.document(KEY).is_none());

    h.clock.advance_minutes(1);
    assert_eq!(
        h.service.confirm_code(EMAIL, &code).await.unwrap_err(),
        DomainError::NotFound
    );
}

#[tokio::test]
async fn test_code_valid_at_exact_expiry() {
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let code = h.notifier.last_code_for(EMAIL).unwrap();

    h.clock.advance_minutes(10);
    assert!(h.service.confirm_code(EMAIL, &code).await.is_ok());
}

#[tokio::test]
async fn test_expired_even_with_wrong_code() {
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let code = h.notifier.last_code_for(EMAIL).unwrap();

    h.clock.advance_minutes(30);
    assert_eq!(
        h.service.confirm_code(EMAIL, &other_code(&code)).await.unwrap_err(),
        DomainError::Expired
    );
}

#[tokio::test]
async fn test_confirm_empty_inputs() {
    let h = harness();

    let err = h.service.confirm_code(EMAIL, "").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument { .. }));

    let err = h.service.confirm_code("", "123456").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument { .. }));

    let err = h.service.confirm_code("not-an-email", "123456").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument { .. }));

    assert_eq!(h.store.call_count(), 0);
}

#[tokio::test]
async fn test_confirm_without_request() {
    let h = harness();

    let err = h.service.confirm_code(EMAIL, "123456").await.unwrap_err();
    assert_eq!(err, DomainError::NotFound);
}

#[tokio::test]
async fn test_notification_failure_rolls_back() {
    let h = harness_with(
        MockRecordStore::new(),
        MockNotifier::failing(),
        VerificationServiceConfig::default(),
    );

    let err = h.service.request_code(EMAIL).await.unwrap_err();
    assert!(matches!(err, DomainError::NotificationFailed { .. }));
    assert!(h.store.document(KEY).is_none());
}

#[tokio::test]
async fn test_notification_failure_without_rollback_keeps_record() {
    let config = VerificationServiceConfig {
        rollback_on_notification_failure: false,
        ..Default::default()
    };
    let h = harness_with(MockRecordStore::new(), MockNotifier::failing(), config);

    let err = h.service.request_code(EMAIL).await.unwrap_err();
    assert!(matches!(err, DomainError::NotificationFailed { .. }));
    assert!(h.store.document(KEY).is_some());
}

#[tokio::test]
async fn test_store_unavailable_on_request() {
    let h = harness_with(
        MockRecordStore::failing(),
        MockNotifier::new(),
        VerificationServiceConfig::default(),
    );

    let err = h.service.request_code(EMAIL).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));
    assert_eq!(h.notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_store_unavailable_on_confirm() {
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let code = h.notifier.last_code_for(EMAIL).unwrap();

    h.store.set_failing(true);
    let err = h.service.confirm_code(EMAIL, &code).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));

    h.store.set_failing(false);
    assert!(h.service.confirm_code(EMAIL, &code).await.is_ok());
}

#[tokio::test]
async fn test_lost_race_reports_not_found() {
    let h = harness();
    h.service.request_code(EMAIL).await.unwrap();
    let code = h.notifier.last_code_for(EMAIL).unwrap();

    h.store.lose_conditional_delete.store(true, Ordering::SeqCst);
    let err = h.service.confirm_code(EMAIL, &code).await.unwrap_err();
    assert_eq!(err, DomainError::NotFound);
}

#[tokio::test]
async fn test_unreadable_document() {
    let h = harness();
    h.store.insert_raw(KEY, "{not json");

    let err = h.service.confirm_code(EMAIL, "123456").await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));
}

#[tokio::test]
async fn test_custom_ttl_and_app_name() {
    let config = VerificationServiceConfig {
        code_ttl_minutes: 90,
        app_name: "Acme".to_string(),
        ..Default::default()
    };
    let h = harness_with(MockRecordStore::new(), MockNotifier::new(), config);

    h.service.request_code(EMAIL).await.unwrap();
    let message = h.notifier.last_message().unwrap();
    assert_eq!(message.subject, "Your Acme verification code");
    assert!(message.text_body.ends_with("It expires in 1 hour 30 minutes."));
}
