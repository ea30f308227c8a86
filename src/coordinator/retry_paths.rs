/// Result of [`OptimisticCoordinator::retry_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetrySummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl<R: Record> OptimisticCoordinator<R> {
    /// Replays a queued operation through the same path as a first attempt.
    ///
    /// The entry leaves the queue before the replay starts, so a second call
    /// with the same id gets `RetryNotFound` instead of submitting twice. A
    /// replay that fails remotely queues a new entry with a new id; a replay
    /// rejected before reaching the gateway puts the original entry back.
    pub async fn retry(&self, entry_id: &str) -> Result<()> {
        let entry = self.state().retries.remove(entry_id);
        let Some(entry) = entry else {
            event!(Level::DEBUG, entry_id, "retry entry no longer queued");
            return Err(SyncError::RetryNotFound(entry_id.to_string()));
        };
        self.replay_taken(entry).await
    }

    /// Replays every queued entry in enqueue order, one at a time.
    ///
    /// Entries created by replays that fail during this call are left queued.
    pub async fn retry_all(&self) -> RetrySummary {
        let ids = self.state().retries.ids();
        let mut summary = RetrySummary::default();

        for id in ids {
            let entry = self.state().retries.remove(&id);
            let Some(entry) = entry else {
                continue;
            };
            summary.attempted += 1;
            match self.replay_taken(entry).await {
                Ok(()) => summary.succeeded += 1,
                Err(_) => summary.failed += 1,
            }
        }

        summary
    }

    /// Drops a queued entry without replaying it.
    pub fn discard_retry(&self, entry_id: &str) -> bool {
        self.state().retries.remove(entry_id).is_some()
    }

    /// Replays an entry already taken off the queue. Rejections such as
    /// `InFlight` never reached the gateway, so the entry is requeued as is.
    async fn replay_taken(&self, entry: RetryEntry<R>) -> Result<()> {
        let original = entry.clone();
        let result = self.replay(entry).await;
        if let Err(err) = &result
            && !err.is_remote()
        {
            event!(
                Level::DEBUG,
                entry_id = %original.id,
                error = %err,
                "replay rejected; entry requeued"
            );
            self.state().retries.enqueue(original);
        }
        result
    }

    async fn replay(&self, entry: RetryEntry<R>) -> Result<()> {
        let attempt = entry.attempt.saturating_add(1);
        event!(
            Level::INFO,
            entry_id = %entry.id,
            action = %entry.kind(),
            attempt,
            "replaying queued operation"
        );

        match entry.action {
            RetryAction::FetchAll => self.fetch_all_attempt(attempt).await.map(|_| ()),
            RetryAction::MutateOne { id, change } => {
                self.mutate_one_attempt(id, change, attempt).await.map(|_| ())
            }
            RetryAction::MutateMany { updates } => {
                self.mutate_many_attempt(updates, attempt).await.map(|_| ())
            }
        }
    }
}
