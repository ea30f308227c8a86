impl<R: Record> OptimisticCoordinator<R> {
    /// Applies a batch of changes once the remote side confirms all of them.
    ///
    /// Nothing is applied optimistically: items change only after the
    /// gateway succeeds. Progress is reported through [`bulk_status`](Self::bulk_status)
    /// and a failure queues one replay covering the whole batch. An empty
    /// batch is a no-op. A batch touching a record with an in-flight
    /// `mutate_one` is rejected.
    pub async fn mutate_many(&self, updates: Vec<(ItemId, R::Change)>) -> Result<Vec<R>> {
        self.mutate_many_attempt(updates, 1).await
    }

    async fn mutate_many_attempt(
        &self,
        updates: Vec<(ItemId, R::Change)>,
        attempt: u32,
    ) -> Result<Vec<R>> {
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        let span = info_span!("coordinator.mutate_many", batch = updates.len(), attempt);

        async move {
            if let Err(err) = self.begin_bulk(&updates) {
                event!(Level::DEBUG, error = %err, "batch rejected");
                self.notify_rejection(&err);
                return Err(err);
            }

            let response = self.gateway.mutate_many(&updates).await;
            match response {
                Ok(confirmed) => {
                    {
                        let mut state = self.state();
                        for item in &confirmed {
                            state.collection.upsert(item.id(), item.clone());
                        }
                        state.bulk = BulkOperation::default();
                    }
                    event!(Level::INFO, count = confirmed.len(), "batch confirmed");
                    self.notify_success(format!(
                        "Updated {} {}",
                        confirmed.len(),
                        self.config.collection_label
                    ));
                    Ok(confirmed)
                }
                Err(err) => {
                    let count = updates.len();
                    let retry_entry_id = {
                        let mut state = self.state();
                        state.bulk.status = OperationStatus::Error;
                        state.bulk.last_error = Some(err.to_string());
                        self.schedule_retry(&mut state, RetryAction::MutateMany { updates }, attempt)
                    };
                    event!(Level::WARN, error = %err, "batch failed");
                    self.notify_failure(
                        &format!("Failed to update {} {}", count, self.config.collection_label),
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

    fn begin_bulk(&self, updates: &[(ItemId, R::Change)]) -> Result<()> {
        for (_, change) in updates {
            R::validate(change).map_err(SyncError::Validation)?;
        }

        let mut state = self.state();
        if let Some((missing, _)) = updates
            .iter()
            .find(|(id, _)| !state.collection.contains(id))
        {
            return Err(SyncError::NotFound(missing.clone()));
        }
        if state.bulk.status == OperationStatus::Loading {
            return Err(SyncError::InFlight(format!(
                "batch update of {}",
                self.config.collection_label
            )));
        }
        if let Some((busy, _)) = updates
            .iter()
            .find(|(id, _)| state.operations.status_of(id) == OperationStatus::Loading)
        {
            return Err(SyncError::InFlight(format!(
                "{} '{}'",
                self.config.item_label, busy
            )));
        }

        state.bulk = BulkOperation {
            status: OperationStatus::Loading,
            last_error: None,
            started_at: Some(Utc::now()),
            ids: updates.iter().map(|(id, _)| id.clone()).collect(),
        };
        Ok(())
    }
}
