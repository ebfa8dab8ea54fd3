//! Unit tests for the code store

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::DomainError;
use crate::services::verification::CodeStore;

use super::mocks::MockRecordStore;

fn record(email: &str, code: &str) -> VerificationRecord {
    VerificationRecord::with_code(
        email.to_string(),
        code.to_string(),
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        Duration::minutes(10),
    )
}

fn code_store() -> (CodeStore<MockRecordStore>, Arc<MockRecordStore>) {
    let store = Arc::new(MockRecordStore::new());
    (CodeStore::new(store.clone(), "email_verifications", 4200), store)
}

#[tokio::test]
async fn test_put_then_get() {
    let (codes, store) = code_store();
    let written = codes
        .put("bob@example.com", &record("bob@example.com", "004211"))
        .await
        .unwrap();

    assert_eq!(
        store.document("email_verifications:bob@example.com").as_deref(),
        Some(written.document())
    );

    let read = codes.get("bob@example.com").await.unwrap();
    assert_eq!(read, written);
    assert_eq!(read.record.code, "004211");
}

#[tokio::test]
async fn test_put_overwrites() {
    let (codes, _) = code_store();
    codes.put("bob@example.com", &record("bob@example.com", "111111")).await.unwrap();
    codes.put("bob@example.com", &record("bob@example.com", "222222")).await.unwrap();

    let read = codes.get("bob@example.com").await.unwrap();
    assert_eq!(read.record.code, "222222");
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let (codes, _) = code_store();
    assert_eq!(
        codes.get("nobody@example.com").await.unwrap_err(),
        DomainError::NotFound
    );
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (codes, _) = code_store();
    codes.put("bob@example.com", &record("bob@example.com", "111111")).await.unwrap();

    assert!(codes.delete("bob@example.com").await.is_ok());
    assert!(codes.delete("bob@example.com").await.is_ok());
    assert_eq!(
        codes.get("bob@example.com").await.unwrap_err(),
        DomainError::NotFound
    );
}

#[tokio::test]
async fn test_delete_exact_ignores_overwritten_record() {
    let (codes, _) = code_store();
    let stale = codes
        .put("bob@example.com", &record("bob@example.com", "111111"))
        .await
        .unwrap();
    codes.put("bob@example.com", &record("bob@example.com", "222222")).await.unwrap();

    assert!(!codes.delete_exact(&stale).await.unwrap());
    assert_eq!(codes.get("bob@example.com").await.unwrap().record.code, "222222");
}

#[tokio::test]
async fn test_store_failure_maps_to_unavailable() {
    let store = Arc::new(MockRecordStore::failing());
    let codes = CodeStore::new(store, "email_verifications", 4200);

    let err = codes
        .put("bob@example.com", &record("bob@example.com", "111111"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));

    let err = codes.get("bob@example.com").await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));
}

#[test]
fn test_key_format() {
    let (codes, _) = code_store();
    assert_eq!(codes.key_for("bob@example.com"), "email_verifications:bob@example.com");
}
