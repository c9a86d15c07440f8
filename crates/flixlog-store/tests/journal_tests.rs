mod common;

use std::sync::Arc;

use common::{memory_journal, timestamps, FlakyStore};
use flixlog_shared::constants::SHOWS_KEY;
use flixlog_shared::{AnnotationId, ShowId};
use flixlog_store::{Journal, KeyValueStore, MemoryStore, SqliteStore, StoreError};

#[tokio::test]
async fn test_get_or_create_is_idempotent_and_case_insensitive() {
    let journal = memory_journal();

    let first = journal.get_or_create_show("Show A").await.unwrap();
    let second = journal.get_or_create_show("Show A").await.unwrap();
    let third = journal.get_or_create_show("show a").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.id, third.id);
    assert_eq!(journal.get_journal().await.len(), 1);
}

#[tokio::test]
async fn test_new_show_has_empty_defaults() {
    let journal = memory_journal();
    let show = journal.get_or_create_show("  Dark  ").await.unwrap();

    assert_eq!(show.title, "Dark");
    assert_eq!(show.rating, 0);
    assert!(show.review.is_empty());
    assert!(show.annotations.is_empty());
    assert!(show.friends.is_empty());
    assert_eq!(show.added_date, show.last_modified);
}

#[tokio::test]
async fn test_empty_title_is_rejected_without_writing() {
    let store = MemoryStore::new();
    let journal = Journal::new(Arc::new(store.clone()));

    let err = journal.get_or_create_show("   ").await.unwrap_err();
    assert!(err.is_validation());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_get_show_by_title_has_no_side_effect() {
    let journal = memory_journal();
    assert!(journal.get_show_by_title("Dark").await.is_none());
    assert!(journal.get_journal().await.is_empty());

    let created = journal.get_or_create_show("Dark").await.unwrap();
    let found = journal.get_show_by_title("DARK").await.unwrap();
    assert_eq!(found.id, created.id);

    // Surrounding whitespace is ignored on lookup.
    let padded = journal.get_show_by_title("  dark ").await.unwrap();
    assert_eq!(padded.id, created.id);
}

#[tokio::test]
async fn test_rating_is_clamped() {
    let journal = memory_journal();
    let show = journal.get_or_create_show("Dark").await.unwrap();

    let low = journal
        .update_show_review(&show.id, "text", -5)
        .await
        .unwrap();
    assert_eq!(low.rating, 0);

    let high = journal
        .update_show_review(&show.id, "  great  ", 99)
        .await
        .unwrap();
    assert_eq!(high.rating, 5);
    assert_eq!(high.review, "great");
    assert!(high.last_modified >= high.added_date);
}

#[tokio::test]
async fn test_update_review_of_missing_show() {
    let journal = memory_journal();
    let err = journal
        .update_show_review(&ShowId::from("nope"), "x", 3)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_annotations_stay_sorted() {
    let journal = memory_journal();
    let show = journal.get_or_create_show("Dark").await.unwrap();

    for ts in [50.0, 10.0, 30.0] {
        journal
            .add_annotation(&show.id, ts, "note")
            .await
            .unwrap();
    }

    let show = journal.get_show(&show.id).await.unwrap();
    assert_eq!(timestamps(&show), vec![10, 30, 50]);
}

#[tokio::test]
async fn test_annotation_validation() {
    let journal = memory_journal();
    let show = journal.get_or_create_show("Dark").await.unwrap();

    for (ts, text) in [(-1.0, "note"), (f64::NAN, "note"), (10.0, "   ")] {
        let err = journal.add_annotation(&show.id, ts, text).await.unwrap_err();
        assert!(err.is_validation(), "{ts} / {text:?} should be rejected");
    }

    assert!(journal.get_show(&show.id).await.unwrap().annotations.is_empty());
}

#[tokio::test]
async fn test_annotation_is_attributed_to_device() {
    let journal = memory_journal();
    let show = journal.get_or_create_show("Dark").await.unwrap();

    let updated = journal.add_annotation(&show.id, 5.0, "hi").await.unwrap();
    let device = journal.device_id().await.unwrap();

    assert_eq!(updated.annotations[0].device_id, device.as_str());
    assert!(device.as_str().starts_with("device_"));
}

#[tokio::test]
async fn test_device_id_is_stable() {
    let journal = memory_journal();
    let a = journal.device_id().await.unwrap();
    let b = journal.device_id().await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_remove_annotation() {
    let journal = memory_journal();
    let show = journal.get_or_create_show("Dark").await.unwrap();
    let show = journal.add_annotation(&show.id, 5.0, "one").await.unwrap();
    let show = journal.add_annotation(&show.id, 9.0, "two").await.unwrap();

    let target = show.annotations[0].id.clone();
    let after = journal.remove_annotation(&show.id, &target).await.unwrap();

    assert_eq!(after.annotations.len(), 1);
    assert_eq!(after.annotations[0].text, "two");

    let err = journal
        .remove_annotation(&show.id, &target)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_then_lookup() {
    let journal = memory_journal();
    let show = journal.get_or_create_show("Dark").await.unwrap();
    let show = journal.add_annotation(&show.id, 5.0, "note").await.unwrap();
    let annotation_id = show.annotations[0].id.clone();

    journal.delete_show(&show.id).await.unwrap();

    assert!(journal.get_journal().await.iter().all(|s| s.id != show.id));
    let err = journal
        .remove_annotation(&show.id, &annotation_id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "Show", .. }));

    let err = journal.delete_show(&show.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_remove_unknown_annotation_of_missing_show() {
    let journal = memory_journal();
    let err = journal
        .remove_annotation(&ShowId::from("ghost"), &AnnotationId::from("x"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_read_failure_degrades_to_empty() {
    let store = FlakyStore::new();
    let journal = Journal::new(Arc::new(store.clone()));
    journal.get_or_create_show("Dark").await.unwrap();

    store.fail_reads(true);
    assert!(journal.get_journal().await.is_empty());
    assert!(journal.get_show_by_title("Dark").await.is_none());

    // Mutations refuse to work from a degraded read.
    let err = journal.get_or_create_show("Other").await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));

    store.fail_reads(false);
    assert_eq!(journal.get_journal().await.len(), 1);
}

#[tokio::test]
async fn test_unreadable_blob_degrades_to_empty() {
    let store = MemoryStore::new();
    store
        .set(std::collections::HashMap::from([(
            SHOWS_KEY.to_string(),
            serde_json::json!({"not": "a list"}),
        )]))
        .await
        .unwrap();

    let journal = Journal::new(Arc::new(store));
    assert!(journal.get_journal().await.is_empty());
    assert!(journal.get_or_create_show("Dark").await.is_err());
}

#[tokio::test]
async fn test_write_failure_propagates() {
    let store = FlakyStore::new();
    let journal = Journal::new(Arc::new(store.clone()));
    let show = journal.get_or_create_show("Dark").await.unwrap();

    store.fail_writes(true);
    let err = journal
        .update_show_review(&show.id, "lost", 4)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));

    store.fail_writes(false);
    assert_eq!(journal.get_show(&show.id).await.unwrap().rating, 0);
}

#[tokio::test]
async fn test_unresolvable_device_falls_back_to_unknown() {
    let store = MemoryStore::new();
    let journal = Journal::new(Arc::new(store.clone()));
    let show = journal.get_or_create_show("Dark").await.unwrap();

    // A device entry of the wrong type cannot be decoded.
    store
        .set(std::collections::HashMap::from([(
            flixlog_shared::constants::DEVICE_ID_KEY.to_string(),
            serde_json::json!(42),
        )]))
        .await
        .unwrap();

    let updated = journal.add_annotation(&show.id, 1.0, "x").await.unwrap();
    assert_eq!(updated.annotations[0].device_id, "unknown");
}

#[tokio::test]
async fn test_concurrent_mutations_do_not_lose_updates() {
    let journal = Arc::new(memory_journal());
    let show = journal.get_or_create_show("Dark").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..20 {
        let journal = Arc::clone(&journal);
        let id = show.id.clone();
        handles.push(tokio::spawn(async move {
            journal
                .add_annotation(&id, i as f64, "note")
                .await
                .unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let show = journal.get_show(&show.id).await.unwrap();
    assert_eq!(show.annotations.len(), 20);
    assert_eq!(timestamps(&show), (0..20).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_journal_persists_in_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");

    let show_id = {
        let journal = Journal::new(Arc::new(SqliteStore::open_at(&path).unwrap()));
        let show = journal.get_or_create_show("Dark").await.unwrap();
        journal.add_annotation(&show.id, 42.0, "kept").await.unwrap();
        show.id
    };

    let journal = Journal::new(Arc::new(SqliteStore::open_at(&path).unwrap()));
    let show = journal.get_show(&show_id).await.unwrap();
    assert_eq!(show.annotations.len(), 1);
    assert_eq!(show.annotations[0].text, "kept");
}

#[tokio::test]
async fn test_backend_is_shared_through_handle() {
    let store = MemoryStore::new();
    let journal = Journal::new(Arc::new(store.clone()));
    journal.get_or_create_show("Dark").await.unwrap();

    let raw = store.get(&[SHOWS_KEY]).await.unwrap();
    assert!(raw[SHOWS_KEY].is_array());
}
