//! Engine Contract Test: Reconciliation Outcomes
//!
//! Verifies the classification contract of a run:
//! - absent locally → exactly one create call, `created` +1
//! - present with differing data → exactly one update call, `updated` +1
//! - present and data-equal → no store call, `skipped` +1
//! - local-only records are left untouched (no delete semantics)
//! - counters always conserve the remote set size
//!
//! If this test fails, the diff decision logic is broken.

mod common;

use common::*;
use usync_core::{Error, UserId};

#[tokio::test]
async fn absent_record_is_created() {
    let source = SnapshotRemoteSource::new(vec![remote(
        1, "john", "John Doe", "john@x.com", "Colombo",
    )]);
    let store = RecordingStore::empty();
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store.clone(), notifier);
    let summary = engine.run_once().await.unwrap();

    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.errors, 0);

    let calls = store.calls().await;
    assert_eq!(calls.len(), 1, "exactly one create call expected");
    match &calls[0] {
        StoreCall::Create(record) => {
            assert_eq!(record.id(), UserId(1));
            assert_eq!(record.username(), "john");
            assert_eq!(record.full_name(), "John Doe");
            assert_eq!(record.email().as_str(), "john@x.com");
            assert_eq!(record.city(), "Colombo");
        }
        other => panic!("expected create, got {other:?}"),
    }
}

#[tokio::test]
async fn differing_record_is_updated_to_remote_values() {
    let source = SnapshotRemoteSource::new(vec![remote(
        1, "john", "John Doe", "new@x.com", "Colombo",
    )]);
    let store = RecordingStore::seeded([local(1, "john", "John Doe", "old@x.com", "Colombo")]);
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store.clone(), notifier);
    let summary = engine.run_once().await.unwrap();

    assert_eq!(
        (summary.created, summary.updated, summary.skipped, summary.errors),
        (0, 1, 0, 0)
    );

    let calls = store.calls().await;
    assert_eq!(calls.len(), 1, "exactly one update call expected");
    assert!(matches!(calls[0], StoreCall::Update(_)));

    // Persisted values equal the remote values exactly, identity fixed.
    let persisted = store.get(1).await.unwrap();
    assert_eq!(persisted.id(), UserId(1));
    assert_eq!(persisted.email().as_str(), "new@x.com");
}

#[tokio::test]
async fn identical_record_is_skipped_without_store_call() {
    let source = SnapshotRemoteSource::new(vec![remote(
        1, "john", "John Doe", "john@x.com", "Colombo",
    )]);
    let store = RecordingStore::seeded([local(1, "john", "John Doe", "john@x.com", "Colombo")]);
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store.clone(), notifier);
    let summary = engine.run_once().await.unwrap();

    assert_eq!(
        (summary.created, summary.updated, summary.skipped, summary.errors),
        (0, 0, 1, 0)
    );
    assert_eq!(store.mutation_count().await, 0);
}

#[tokio::test]
async fn field_comparison_is_case_sensitive() {
    // Same letters, different case: must be treated as an update.
    let source = SnapshotRemoteSource::new(vec![remote(
        1, "John", "John Doe", "john@x.com", "Colombo",
    )]);
    let store = RecordingStore::seeded([local(1, "john", "John Doe", "john@x.com", "Colombo")]);
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store.clone(), notifier);
    let summary = engine.run_once().await.unwrap();

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, 0);
}

#[tokio::test]
async fn local_only_records_are_untouched() {
    let source = SnapshotRemoteSource::new(vec![remote(
        1, "john", "John Doe", "john@x.com", "Colombo",
    )]);
    let store = RecordingStore::seeded([
        local(1, "john", "John Doe", "john@x.com", "Colombo"),
        local(99, "ghost", "Gone Remote", "ghost@x.com", "Galle"),
    ]);
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store.clone(), notifier);
    let summary = engine.run_once().await.unwrap();

    // The local-only record affects no counter and receives no call.
    assert_eq!(summary.total(), 1);
    assert_eq!(store.mutation_count().await, 0);
    assert!(store.get(99).await.is_some(), "no delete semantics");
}

#[tokio::test]
async fn mixed_remote_set_conserves_counts() {
    let source = SnapshotRemoteSource::new(vec![
        remote(1, "john", "John Doe", "john@x.com", "Colombo"), // create
        remote(2, "jane", "Jane Roe", "jane@x.com", "Kandy"),   // skip
        remote(3, "max", "Max Low", "max-new@x.com", "Galle"),  // update
        remote(4, "bad", "Bad Row", "no-at-sign", "Matara"),    // error
    ]);
    let store = RecordingStore::seeded([
        local(2, "jane", "Jane Roe", "jane@x.com", "Kandy"),
        local(3, "max", "Max Low", "max-old@x.com", "Galle"),
    ]);
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store, notifier);
    let summary = engine.run_once().await.unwrap();

    assert_eq!(
        (summary.created, summary.updated, summary.skipped, summary.errors),
        (1, 1, 1, 1)
    );
    assert_eq!(summary.total(), 4, "counters must conserve the input size");
}

#[tokio::test]
async fn empty_remote_set_yields_zero_summary_and_still_notifies() {
    let source = SnapshotRemoteSource::new(Vec::new());
    let store = RecordingStore::seeded([local(7, "ann", "Ann Lee", "ann@x.com", "Jaffna")]);
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store.clone(), notifier.clone());
    let summary = engine.run_once().await.unwrap();

    assert!(summary.is_empty());
    assert_eq!(store.mutation_count().await, 0);
    assert_eq!(notifier.call_count(), 1, "zero summary is still notified");
    assert_eq!(notifier.last_summary().await, Some(summary));
}

#[tokio::test]
async fn duplicate_identities_are_evaluated_against_the_run_start_snapshot() {
    // The local index is not updated in-memory mid-run, so the second
    // occurrence of id 1 sees the same (absent) snapshot entry and is
    // attempted as a second create.
    let source = SnapshotRemoteSource::new(vec![
        remote(1, "john", "John Doe", "john@x.com", "Colombo"),
        remote(1, "john", "John Doe", "john@x.com", "Colombo"),
    ]);
    let store = RecordingStore::empty();
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store.clone(), notifier);
    let summary = engine.run_once().await.unwrap();

    // The second create fails on the duplicate key and is counted as a
    // per-record error; the batch is unaffected.
    assert_eq!(summary.created, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.total(), 2);
    assert_eq!(store.mutation_count().await, 2, "both creates attempted");
}

#[tokio::test]
async fn remote_fetch_failure_aborts_before_any_store_access() {
    let source = SnapshotRemoteSource::failing();
    let store = RecordingStore::empty();
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store.clone(), notifier.clone());
    let err = engine.run_once().await.unwrap_err();

    assert!(matches!(err, Error::RemoteSource(_)));
    assert_eq!(store.mutation_count().await, 0);
    assert_eq!(notifier.call_count(), 0, "aborted run is not notified");
}

#[tokio::test]
async fn local_fetch_failure_aborts_the_run() {
    let source = SnapshotRemoteSource::new(vec![remote(
        1, "john", "John Doe", "john@x.com", "Colombo",
    )]);
    let store = RecordingStore::failing_fetch();
    let notifier = RecordingNotifier::new();

    let engine = engine_with(source, store.clone(), notifier.clone());
    let err = engine.run_once().await.unwrap_err();

    assert!(matches!(err, Error::Store(_)));
    assert_eq!(store.mutation_count().await, 0);
    assert_eq!(notifier.call_count(), 0);
}
