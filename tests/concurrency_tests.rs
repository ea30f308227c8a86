/// Concurrency tests
///
/// Independent mutations share one coordinator and resolve independently.
/// Run with: cargo test --test concurrency_tests
mod support;

use futures::poll;
use optimo::{ItemId, OperationStatus, RetryActionKind, SyncError};
use std::sync::Arc;
use std::time::Duration;
use support::{BookmarkPatch, Fixture, bookmark, library};

#[tokio::test(start_paused = true)]
async fn distinct_records_resolve_independently() {
    let fixture = Fixture::loaded(library())
        .await
        .with_delay(Duration::from_millis(100));
    // Record 3 disappears on the server, so only its mutation fails.
    fixture.gateway.remove(&ItemId::from(3u64));

    let (first, third) = tokio::join!(
        fixture
            .coordinator
            .mutate_one(1u64, BookmarkPatch::status("archived")),
        fixture
            .coordinator
            .mutate_one(3u64, BookmarkPatch::status("archived")),
    );

    assert_eq!(first.unwrap().status, "archived");
    assert!(third.is_err());

    assert_eq!(fixture.coordinator.get(1u64).unwrap().status, "archived");
    assert_eq!(fixture.coordinator.get(3u64), Some(bookmark(3, "present")));
    assert_eq!(fixture.coordinator.operation_status(1u64), OperationStatus::Idle);
    assert_eq!(fixture.coordinator.operation_status(3u64), OperationStatus::Error);

    let pending = fixture.coordinator.pending_retries();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].kind(), RetryActionKind::MutateOne);
    assert_eq!(pending[0].description, "Update bookmark '3'");
}

#[tokio::test(start_paused = true)]
async fn batch_is_rejected_for_a_record_with_an_in_flight_mutation() {
    let fixture = Fixture::loaded(library())
        .await
        .with_delay(Duration::from_millis(100));

    let single = fixture
        .coordinator
        .mutate_one(2u64, BookmarkPatch::title("Rust book"));
    tokio::pin!(single);
    assert!(poll!(single.as_mut()).is_pending());
    fixture.gateway.fail_next(1);

    let batch = fixture
        .coordinator
        .mutate_many(vec![
            (ItemId::from(1u64), BookmarkPatch::status("archived")),
            (ItemId::from(2u64), BookmarkPatch::status("archived")),
        ])
        .await;

    assert!(matches!(batch, Err(SyncError::InFlight(_))));
    assert_eq!(fixture.gateway.call_counts().mutate_many, 0);
    assert_eq!(fixture.coordinator.bulk_status().status, OperationStatus::Idle);

    assert!(single.await.is_err());
    let id = ItemId::from(2u64);
    assert_eq!(fixture.coordinator.get(&id), fixture.gateway.record(&id));
    assert_eq!(fixture.coordinator.get(&id), Some(bookmark(2, "absent")));
}

#[tokio::test(start_paused = true)]
async fn mutation_is_rejected_for_a_record_in_a_pending_batch() {
    let fixture = Fixture::loaded(library())
        .await
        .with_delay(Duration::from_millis(100));

    let batch = fixture
        .coordinator
        .mutate_many(vec![(ItemId::from(2u64), BookmarkPatch::status("archived"))]);
    tokio::pin!(batch);
    assert!(poll!(batch.as_mut()).is_pending());

    let single = fixture
        .coordinator
        .mutate_one(2u64, BookmarkPatch::title("Rust book"))
        .await;

    assert!(matches!(single, Err(SyncError::InFlight(_))));
    assert_eq!(fixture.gateway.call_counts().mutate_one, 0);
    assert_eq!(fixture.coordinator.operation_status(2u64), OperationStatus::Idle);
    assert_eq!(fixture.coordinator.get(2u64).unwrap().title, "bookmark 2");

    batch.await.unwrap();
    let id = ItemId::from(2u64);
    assert_eq!(fixture.coordinator.get(&id), fixture.gateway.record(&id));
    assert_eq!(fixture.coordinator.get(&id).unwrap().status, "archived");
}

#[tokio::test(start_paused = true)]
async fn batch_and_single_mutations_interleave() {
    let fixture = Fixture::loaded(library())
        .await
        .with_delay(Duration::from_millis(50));

    let (single, batch) = tokio::join!(
        fixture
            .coordinator
            .mutate_one(2u64, BookmarkPatch::title("Rust book")),
        fixture.coordinator.mutate_many(vec![
            (ItemId::from(1u64), BookmarkPatch::status("archived")),
            (ItemId::from(3u64), BookmarkPatch::status("archived")),
        ]),
    );

    assert!(single.is_ok());
    assert_eq!(batch.unwrap().len(), 2);
    assert_eq!(fixture.coordinator.get(2u64).unwrap().title, "Rust book");
    assert_eq!(fixture.coordinator.get(1u64).unwrap().status, "archived");
    assert!(!fixture.coordinator.any_in_progress());
    assert!(fixture.coordinator.pending_retries().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn spawned_tasks_share_one_coordinator() {
    let records: Vec<_> = (1..=20u64).map(|id| bookmark(id, "absent")).collect();
    let fixture = Arc::new(Fixture::loaded(records).await);
    fixture.gateway.set_delay(Duration::from_millis(5));

    let mut handles = Vec::new();
    for id in 1..=20u64 {
        let fixture = Arc::clone(&fixture);
        handles.push(tokio::spawn(async move {
            fixture
                .coordinator
                .mutate_one(id, BookmarkPatch::status("present"))
                .await
        }));
    }

    for handle in handles {
        let confirmed = handle.await.unwrap().unwrap();
        assert_eq!(confirmed.status, "present");
    }

    let items = fixture.coordinator.get_all();
    assert_eq!(items.len(), 20);
    assert!(items.values().all(|item| item.status == "present" && item.revision == 1));
    assert!(!fixture.coordinator.any_in_progress());
    assert_eq!(fixture.gateway.call_counts().mutate_one, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failing_spawned_tasks_all_roll_back() {
    let records: Vec<_> = (1..=10u64).map(|id| bookmark(id, "absent")).collect();
    let fixture = Arc::new(Fixture::loaded(records).await);
    fixture.gateway.set_failing(true);

    let handles: Vec<_> = (1..=10u64)
        .map(|id| {
            let fixture = Arc::clone(&fixture);
            tokio::spawn(async move {
                fixture
                    .coordinator
                    .mutate_one(id, BookmarkPatch::status("present"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_err());
    }

    for id in 1..=10u64 {
        assert_eq!(fixture.coordinator.get(id), Some(bookmark(id, "absent")));
        assert_eq!(fixture.coordinator.operation_status(id), OperationStatus::Error);
    }
    assert_eq!(fixture.coordinator.pending_retries().len(), 10);
    assert_eq!(fixture.persistent_errors().len(), 10);
}
