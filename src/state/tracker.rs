use crate::core::{ItemId, OperationStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Metadata for one optimistic mutation that is in flight or has failed.
#[derive(Debug, Clone)]
pub struct OperationRecord<R> {
    pub status: OperationStatus,
    /// Independent copy of the item taken before the optimistic edit.
    pub previous_state: R,
    pub started_at: DateTime<Utc>,
    /// Strictly increasing across every `begin` on the same tracker.
    pub sequence: u64,
    pub last_error: Option<String>,
}

/// Per-item operation bookkeeping.
///
/// A record exists for an id only while a mutation on it is in flight or
/// after it failed; success removes the record.
#[derive(Debug, Clone)]
pub struct OperationTracker<R> {
    records: HashMap<ItemId, OperationRecord<R>>,
    next_sequence: u64,
}

impl<R> Default for OperationTracker<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> OperationTracker<R> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            next_sequence: 1,
        }
    }

    /// Creates or overwrites the record for `id` with status `Loading`.
    pub fn begin(&mut self, id: ItemId, previous_state: R) -> &OperationRecord<R> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let record = OperationRecord {
            status: OperationStatus::Loading,
            previous_state,
            started_at: Utc::now(),
            sequence,
            last_error: None,
        };
        self.records.insert(id.clone(), record);
        &self.records[&id]
    }

    /// Marks an existing record as failed. Returns `false` when nothing was tracked.
    pub fn fail(&mut self, id: &ItemId, message: impl Into<String>) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                record.status = OperationStatus::Error;
                record.last_error = Some(message.into());
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, id: &ItemId) -> Option<OperationRecord<R>> {
        self.records.remove(id)
    }

    pub fn status_of(&self, id: &ItemId) -> OperationStatus {
        self.records
            .get(id)
            .map(|record| record.status)
            .unwrap_or(OperationStatus::Idle)
    }

    pub fn any_in_progress(&self) -> bool {
        self.records
            .values()
            .any(|record| record.status == OperationStatus::Loading)
    }

    pub fn record(&self, id: &ItemId) -> Option<&OperationRecord<R>> {
        self.records.get(id)
    }

    pub fn previous_state(&self, id: &ItemId) -> Option<&R> {
        self.records.get(id).map(|record| &record.previous_state)
    }

    pub fn failed_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self
            .records
            .iter()
            .filter(|(_, record)| record.status == OperationStatus::Error)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &OperationRecord<R>)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
