impl<R: Record> OptimisticCoordinator<R> {
    /// Reloads the whole collection from the remote side.
    ///
    /// Per-item operation records are left untouched, so a refresh never
    /// cancels in-flight edits. On failure the collection moves to `Error`
    /// and a `FetchAll` replay is queued. Returns the number of loaded items.
    pub async fn fetch_all(&self) -> Result<usize> {
        self.fetch_all_attempt(1).await
    }

    async fn fetch_all_attempt(&self, attempt: u32) -> Result<usize> {
        let span = info_span!(
            "coordinator.fetch_all",
            collection = %self.config.collection_label,
            attempt
        );

        async move {
            self.state().collection.set_status(CollectionStatus::Loading);
            event!(Level::DEBUG, "fetch started");

            let response = self.gateway.fetch_all().await;
            match response {
                Ok(items) => {
                    let count = items.len();
                    self.state().collection.set_data(items);
                    event!(Level::INFO, count, "fetch committed");
                    self.notify_success(format!(
                        "Loaded {} {}",
                        count, self.config.collection_label
                    ));
                    Ok(count)
                }
                Err(err) => {
                    let retry_entry_id = {
                        let mut state = self.state();
                        state.collection.set_error(err.to_string());
                        self.schedule_retry(&mut state, RetryAction::FetchAll, attempt)
                    };
                    event!(Level::WARN, error = %err, "fetch failed");
                    self.notify_failure(
                        &format!("Failed to load {}", self.config.collection_label),
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
}
