// Coordinator implementation is split by operation family; all parts share
// this module's imports and private helpers.

use crate::config::CoordinatorConfig;
use crate::core::{
    CollectionStatus, ItemId, OperationStatus, Record, RemoteError, Result, SyncError,
};
use crate::gateway::RemoteGateway;
use crate::notify::{Notification, NotificationSink};
use crate::retry::{RetryAction, RetryActionKind, RetryEntry, RetryQueue};
use crate::state::{AsyncCollectionState, Items, OperationTracker};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{Instrument, Level, event, info_span};

/// Progress of the batch operation driven by `mutate_many`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOperation {
    pub status: OperationStatus,
    pub last_error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// Records covered by the current or last failed batch.
    pub ids: Vec<ItemId>,
}

struct CoordinatorState<R: Record> {
    collection: AsyncCollectionState<R>,
    operations: OperationTracker<R>,
    bulk: BulkOperation,
    retries: RetryQueue<R>,
}

/// Optimistic mutation coordinator for one remotely-backed collection.
///
/// Owns the collection state, the per-item operation tracker and the retry
/// queue, and is the only writer of all three. Every method takes `&self`:
/// the internal lock is held only for synchronous sections and never across
/// a remote call, so concurrent calls interleave at their await points only.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use optimo::{ItemId, NotificationCenter, OptimisticCoordinator, Record, SimulatedGateway};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Todo { id: u64, done: bool }
///
/// impl Record for Todo {
///     type Change = bool;
///     fn id(&self) -> ItemId { ItemId::from(self.id) }
///     fn apply(&mut self, done: &bool) { self.done = *done; }
/// }
///
/// # tokio_test::block_on(async {
/// let gateway = Arc::new(SimulatedGateway::new(vec![Todo { id: 1, done: false }]));
/// let coordinator: OptimisticCoordinator<Todo> =
///     OptimisticCoordinator::new(gateway, Arc::new(NotificationCenter::new()));
///
/// coordinator.fetch_all().await.unwrap();
/// coordinator.mutate_one(1u64, true).await.unwrap();
/// assert!(coordinator.get(1u64).unwrap().done);
/// # });
/// ```
pub struct OptimisticCoordinator<R: Record> {
    config: CoordinatorConfig,
    gateway: Arc<dyn RemoteGateway<R>>,
    sink: Arc<dyn NotificationSink>,
    state: Mutex<CoordinatorState<R>>,
}

impl<R: Record> OptimisticCoordinator<R> {
    pub fn new(gateway: Arc<dyn RemoteGateway<R>>, sink: Arc<dyn NotificationSink>) -> Self {
        Self::with_config(gateway, sink, CoordinatorConfig::default())
    }

    pub fn with_config(
        gateway: Arc<dyn RemoteGateway<R>>,
        sink: Arc<dyn NotificationSink>,
        config: CoordinatorConfig,
    ) -> Self {
        let retries = match config.max_retry_entries {
            Some(capacity) => RetryQueue::with_capacity(capacity),
            None => RetryQueue::new(),
        };

        Self {
            config,
            gateway,
            sink,
            state: Mutex::new(CoordinatorState {
                collection: AsyncCollectionState::new(),
                operations: OperationTracker::new(),
                bulk: BulkOperation::default(),
                retries,
            }),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    // Every critical section leaves the state consistent, so a poisoned lock
    // is still safe to use.
    fn state(&self) -> MutexGuard<'_, CoordinatorState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notification: Notification) {
        self.sink.push(notification);
    }

    fn notify_success(&self, message: String) {
        if self.config.notify_on_success {
            self.notify(Notification::success(message));
        }
    }

    /// Reports a call rejected before it changed any state.
    fn notify_rejection(&self, err: &SyncError) {
        let notification = match err {
            SyncError::InFlight(_) => Notification::warning(err.to_string()),
            _ => Notification::error(err.to_string()),
        };
        self.notify(notification);
    }

    /// Persistent failure notice for a remote rejection.
    fn notify_failure(&self, summary: &str, err: &RemoteError, retry_entry_id: Option<String>) {
        let message = match retry_entry_id {
            Some(_) => format!("{summary}: {err}"),
            None => format!("{summary}: {err} (retry limit reached)"),
        };
        self.notify(Notification::failure(message, retry_entry_id));
    }

    /// Queues `action` for replay unless `attempt` hit the configured cap.
    fn schedule_retry(
        &self,
        state: &mut CoordinatorState<R>,
        action: RetryAction<R>,
        attempt: u32,
    ) -> Option<String> {
        if !self.config.allows_retry_after(attempt) {
            event!(
                Level::WARN,
                attempt,
                action = %action.kind(),
                "retry limit reached; operation not re-queued"
            );
            return None;
        }

        let description = self.describe(&action);
        let entry = RetryEntry::new(action, description).with_attempt(attempt);
        Some(state.retries.enqueue(entry))
    }

    fn describe(&self, action: &RetryAction<R>) -> String {
        match action {
            RetryAction::FetchAll => format!("Reload {}", self.config.collection_label),
            RetryAction::MutateOne { id, .. } => {
                format!("Update {} '{}'", self.config.item_label, id)
            }
            RetryAction::MutateMany { updates } => {
                format!("Update {} {}", updates.len(), self.config.collection_label)
            }
        }
    }
}

include!("coordinator/fetch_paths.rs");
include!("coordinator/mutate_paths.rs");
include!("coordinator/bulk_paths.rs");
include!("coordinator/retry_paths.rs");
include!("coordinator/query_paths.rs");
