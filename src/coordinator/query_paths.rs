/// Serializable read-only view of a coordinator, for display code.
#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorSnapshot<R> {
    pub status: CollectionStatus,
    pub last_error: Option<String>,
    /// Sorted by id.
    pub items: Vec<R>,
    pub operations: Vec<OperationView>,
    pub bulk_status: OperationStatus,
    pub pending_retries: Vec<RetryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationView {
    pub id: ItemId,
    pub status: OperationStatus,
    pub last_error: Option<String>,
    pub started_at: DateTime<Utc>,
    /// Start order across all records; higher started later.
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetryView {
    pub id: String,
    pub action: RetryActionKind,
    pub description: String,
    pub attempt: u32,
    pub enqueued_at: DateTime<Utc>,
}

impl<R: Record> OptimisticCoordinator<R> {
    /// Current value of a record, optimistic edits included.
    pub fn get(&self, id: impl Into<ItemId>) -> Option<R> {
        self.state().collection.get(&id.into()).cloned()
    }

    pub fn get_all(&self) -> Items<R> {
        self.state().collection.items()
    }

    pub fn status(&self) -> CollectionStatus {
        self.state().collection.status()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().collection.last_error().map(str::to_string)
    }

    /// `Idle` when no mutation of the record is in flight or failed.
    pub fn operation_status(&self, id: impl Into<ItemId>) -> OperationStatus {
        self.state().operations.status_of(&id.into())
    }

    pub fn operation_error(&self, id: impl Into<ItemId>) -> Option<String> {
        self.state()
            .operations
            .record(&id.into())
            .and_then(|record| record.last_error.clone())
    }

    /// Records whose last mutation failed and was rolled back, sorted.
    pub fn failed_ids(&self) -> Vec<ItemId> {
        self.state().operations.failed_ids()
    }

    /// `true` while a collection fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state().collection.status() == CollectionStatus::Loading
    }

    /// `true` while any per-item mutation or batch is in flight.
    pub fn any_in_progress(&self) -> bool {
        let state = self.state();
        state.operations.any_in_progress() || state.bulk.status == OperationStatus::Loading
    }

    pub fn bulk_status(&self) -> BulkOperation {
        self.state().bulk.clone()
    }

    /// Queued replays in enqueue order.
    pub fn pending_retries(&self) -> Vec<RetryEntry<R>> {
        self.state().retries.entries()
    }

    /// The sink this coordinator reports to.
    pub fn notifications(&self) -> Arc<dyn NotificationSink> {
        Arc::clone(&self.sink)
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot<R> {
        let state = self.state();

        let mut items: Vec<R> = state.collection.items().values().cloned().collect();
        items.sort_by_key(|item| item.id());

        let mut operations: Vec<OperationView> = state
            .operations
            .iter()
            .map(|(id, record)| OperationView {
                id: id.clone(),
                status: record.status,
                last_error: record.last_error.clone(),
                started_at: record.started_at,
                sequence: record.sequence,
            })
            .collect();
        operations.sort_by(|left, right| left.id.cmp(&right.id));

        let pending_retries = state
            .retries
            .entries()
            .into_iter()
            .map(|entry| RetryView {
                action: entry.kind(),
                id: entry.id,
                description: entry.description,
                attempt: entry.attempt,
                enqueued_at: entry.enqueued_at,
            })
            .collect();

        CoordinatorSnapshot {
            status: state.collection.status(),
            last_error: state.collection.last_error().map(str::to_string),
            items,
            operations,
            bulk_status: state.bulk.status,
            pending_retries,
        }
    }
}
