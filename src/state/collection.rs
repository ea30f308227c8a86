use crate::core::{CollectionStatus, ItemId, Record};

/// Persistent map used for the item mapping; clones share structure.
pub type Items<R> = im::HashMap<ItemId, R>;

/// Items of one remotely-backed collection plus its aggregate fetch status.
///
/// All mutators are infallible. `last_error` is `Some` exactly when the
/// status is [`CollectionStatus::Error`].
#[derive(Debug, Clone)]
pub struct AsyncCollectionState<R: Record> {
    items: Items<R>,
    status: CollectionStatus,
    last_error: Option<String>,
}

impl<R: Record> Default for AsyncCollectionState<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> AsyncCollectionState<R> {
    pub fn new() -> Self {
        Self {
            items: Items::new(),
            status: CollectionStatus::Idle,
            last_error: None,
        }
    }

    pub fn status(&self) -> CollectionStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn get(&self, id: &ItemId) -> Option<&R> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Returns the whole mapping. This is an O(1) structural clone.
    pub fn items(&self) -> Items<R> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sets the status. Moving to `Error` without a message records a generic
    /// one; any other status clears the stored message.
    pub fn set_status(&mut self, status: CollectionStatus) {
        self.status = status;
        if status == CollectionStatus::Error {
            if self.last_error.is_none() {
                self.last_error = Some("unknown error".to_string());
            }
        } else {
            self.last_error = None;
        }
    }

    /// Replaces the full mapping and marks the collection as loaded.
    pub fn set_data(&mut self, items: impl IntoIterator<Item = R>) {
        self.items = items.into_iter().map(|item| (item.id(), item)).collect();
        self.status = CollectionStatus::Success;
        self.last_error = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = CollectionStatus::Error;
        self.last_error = Some(message.into());
    }

    /// Writes a single entry without touching the collection status.
    pub fn upsert(&mut self, id: ItemId, item: R) -> Option<R> {
        self.items.insert(id, item)
    }
}
