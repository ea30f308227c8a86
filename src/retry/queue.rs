use super::RetryEntry;
use crate::core::Record;
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

/// Deferred operations eligible for replay.
///
/// Entries keep enqueue order but callers may take any of them. Enqueue and
/// `pop_front` are O(1) amortized; `remove` is O(1) and idempotent. Removal
/// leaves the id in the order list as a tombstone which is skipped lazily and
/// compacted once tombstones outnumber live entries.
pub struct RetryQueue<R: Record> {
    order: VecDeque<String>,
    entries: HashMap<String, RetryEntry<R>>,
    capacity: Option<usize>,
}

impl<R: Record> Default for RetryQueue<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RetryQueue<R> {
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
            entries: HashMap::new(),
            capacity: None,
        }
    }

    /// Queue that evicts its oldest entry once `capacity` entries are held.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new()
        }
    }

    /// Appends `entry`, assigning a fresh id when it has none. Returns the id.
    pub fn enqueue(&mut self, mut entry: RetryEntry<R>) -> String {
        if entry.id.is_empty() || self.entries.contains_key(&entry.id) {
            entry.id = Uuid::new_v4().to_string();
        } else {
            // A requeued id may still sit in `order` as a tombstone.
            self.order.retain(|queued| queued != &entry.id);
        }

        if let Some(capacity) = self.capacity {
            while self.entries.len() >= capacity {
                match self.pop_front() {
                    Some(evicted) => warn!(
                        "retry queue full (capacity {}): dropping oldest entry '{}' ({})",
                        capacity, evicted.id, evicted.description
                    ),
                    None => break,
                }
            }
        }

        let id = entry.id.clone();
        debug!("retry queued: id='{}' action='{}'", id, entry.kind());
        self.order.push_back(id.clone());
        self.entries.insert(id.clone(), entry);
        id
    }

    /// Takes the oldest live entry.
    pub fn pop_front(&mut self) -> Option<RetryEntry<R>> {
        while let Some(id) = self.order.pop_front() {
            if let Some(entry) = self.entries.remove(&id) {
                return Some(entry);
            }
        }
        None
    }

    /// Removes and returns the entry. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<RetryEntry<R>> {
        let removed = self.entries.remove(id);
        if removed.is_some() {
            self.compact_if_sparse();
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&RetryEntry<R>> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Live entries in enqueue order.
    pub fn entries(&self) -> Vec<RetryEntry<R>> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .cloned()
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| self.entries.contains_key(*id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    fn compact_if_sparse(&mut self) {
        let tombstones = self.order.len() - self.entries.len();
        if tombstones > 16 && tombstones > self.entries.len() {
            let entries = &self.entries;
            self.order.retain(|id| entries.contains_key(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ItemId;
    use crate::retry::{RetryAction, RetryActionKind};

    #[derive(Clone)]
    struct Counter {
        id: u64,
        value: i64,
    }

    impl Record for Counter {
        type Change = i64;

        fn id(&self) -> ItemId {
            ItemId::from(self.id)
        }

        fn apply(&mut self, change: &i64) {
            self.value += change;
        }
    }

    fn mutate(id: u64) -> RetryEntry<Counter> {
        RetryEntry::new(
            RetryAction::MutateOne {
                id: ItemId::from(id),
                change: 1,
            },
            format!("bump {id}"),
        )
    }

    #[test]
    fn enqueue_assigns_unique_ids() {
        let mut queue = RetryQueue::new();
        let first = queue.enqueue(mutate(1));
        let second = queue.enqueue(mutate(1));

        assert!(!first.is_empty());
        assert_ne!(first, second);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.get(&first).unwrap().kind(), RetryActionKind::MutateOne);
    }

    #[test]
    fn enqueue_keeps_a_preassigned_id() {
        let mut queue = RetryQueue::new();
        let mut entry = mutate(1);
        entry.id = "fixed".to_string();

        assert_eq!(queue.enqueue(entry), "fixed");
        assert!(queue.contains("fixed"));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut queue = RetryQueue::new();
        let id = queue.enqueue(mutate(1));

        assert!(queue.remove(&id).is_some());
        assert!(queue.remove(&id).is_none());
        assert!(queue.remove("never-existed").is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn pop_front_skips_removed_entries() {
        let mut queue = RetryQueue::new();
        let a = queue.enqueue(mutate(1));
        let b = queue.enqueue(mutate(2));
        let c = queue.enqueue(mutate(3));

        queue.remove(&a);
        assert_eq!(queue.ids(), vec![b.clone(), c.clone()]);
        assert_eq!(queue.pop_front().map(|entry| entry.id), Some(b));
        assert_eq!(queue.pop_front().map(|entry| entry.id), Some(c));
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn tombstones_are_compacted() {
        let mut queue = RetryQueue::new();
        let ids: Vec<String> = (0..40).map(|n| queue.enqueue(mutate(n))).collect();
        for id in &ids[..38] {
            queue.remove(id);
        }

        assert_eq!(queue.len(), 2);
        assert!(queue.order.len() < 40);
        assert_eq!(queue.ids(), ids[38..].to_vec());
    }

    #[test]
    fn requeued_id_is_listed_once() {
        let mut queue = RetryQueue::new();
        let first = queue.enqueue(mutate(1));
        let second = queue.enqueue(mutate(2));

        let taken = queue.remove(&first).expect("queued");
        assert_eq!(queue.enqueue(taken), first);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.ids(), vec![second, first.clone()]);
        assert_eq!(queue.entries().len(), 2);
        queue.pop_front();
        assert_eq!(queue.pop_front().map(|entry| entry.id), Some(first));
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut queue = RetryQueue::with_capacity(2);
        let a = queue.enqueue(mutate(1));
        let b = queue.enqueue(mutate(2));
        let c = queue.enqueue(mutate(3));

        assert!(!queue.contains(&a));
        assert_eq!(queue.ids(), vec![b, c]);
    }
}
