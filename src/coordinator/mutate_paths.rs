impl<R: Record> OptimisticCoordinator<R> {
    /// Applies `change` to one record optimistically, then confirms it remotely.
    ///
    /// The edit is visible through [`get`](Self::get) before the remote call
    /// is issued. On success the gateway's value replaces the optimistic one
    /// and the operation record is cleared. On failure the pre-edit snapshot
    /// is restored exactly, the record is marked failed and a replay is
    /// queued. The collection status is never touched.
    ///
    /// Rejected without side effects (other than a notification) when the
    /// change fails validation, the record is unknown, or another mutation of
    /// the same record is still in flight, batches included.
    pub async fn mutate_one(&self, id: impl Into<ItemId>, change: R::Change) -> Result<R> {
        self.mutate_one_attempt(id.into(), change, 1).await
    }

    async fn mutate_one_attempt(&self, id: ItemId, change: R::Change, attempt: u32) -> Result<R> {
        let span = info_span!("coordinator.mutate_one", item_id = %id, attempt);

        async move {
            if let Err(err) = self.begin_optimistic(&id, &change) {
                event!(Level::DEBUG, error = %err, "mutation rejected");
                self.notify_rejection(&err);
                return Err(err);
            }
            event!(Level::DEBUG, "optimistic edit applied");

            let response = self.gateway.mutate_one(&id, &change).await;
            match response {
                Ok(confirmed) => {
                    {
                        let mut state = self.state();
                        state.collection.upsert(id.clone(), confirmed.clone());
                        state.operations.clear(&id);
                    }
                    event!(Level::INFO, "mutation confirmed");
                    self.notify_success(format!("Updated {} '{}'", self.config.item_label, id));
                    Ok(confirmed)
                }
                Err(err) => {
                    let retry_entry_id = {
                        let mut state = self.state();
                        let previous = state.operations.previous_state(&id).cloned();
                        if let Some(previous) = previous {
                            state.collection.upsert(id.clone(), previous);
                        }
                        state.operations.fail(&id, err.to_string());
                        let action = RetryAction::MutateOne {
                            id: id.clone(),
                            change,
                        };
                        self.schedule_retry(&mut state, action, attempt)
                    };
                    event!(Level::WARN, error = %err, "mutation failed; rolled back");
                    self.notify_failure(
                        &format!("Failed to update {} '{}'", self.config.item_label, id),
                        &err,
                        retry_entry_id,
                    );
                    Err(SyncError::TransientRemote(err))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Snapshot, tracker entry and optimistic write happen under one lock.
    fn begin_optimistic(&self, id: &ItemId, change: &R::Change) -> Result<()> {
        R::validate(change).map_err(SyncError::Validation)?;

        let mut state = self.state();
        let Some(current) = state.collection.get(id).cloned() else {
            return Err(SyncError::NotFound(id.clone()));
        };
        let batched = state.bulk.status == OperationStatus::Loading && state.bulk.ids.contains(id);
        if batched || state.operations.status_of(id) == OperationStatus::Loading {
            return Err(SyncError::InFlight(format!(
                "{} '{}'",
                self.config.item_label, id
            )));
        }

        let mut optimistic = current.clone();
        optimistic.apply(change);
        state.operations.begin(id.clone(), current);
        state.collection.upsert(id.clone(), optimistic);
        Ok(())
    }
}
