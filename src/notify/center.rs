use super::{Notification, NotificationSink};
use chrono::{Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

const DEFAULT_CAPACITY: usize = 100;

/// In-memory notification store for display code.
///
/// Keeps at most `capacity` notifications; when full, the oldest dismissed
/// one is dropped first, then the oldest overall.
pub struct NotificationCenter {
    entries: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every stored notification, oldest first, dismissed ones included.
    pub fn all(&self) -> Vec<Notification> {
        self.entries().iter().cloned().collect()
    }

    /// Notifications that have not been dismissed.
    pub fn active(&self) -> Vec<Notification> {
        self.entries()
            .iter()
            .filter(|notification| !notification.dismissed)
            .cloned()
            .collect()
    }

    pub fn persistent(&self) -> Vec<Notification> {
        self.entries()
            .iter()
            .filter(|notification| notification.persistent && !notification.dismissed)
            .cloned()
            .collect()
    }

    pub fn dismiss(&self, id: &str) -> bool {
        let mut entries = self.entries();
        match entries.iter_mut().find(|notification| notification.id == id) {
            Some(notification) if !notification.dismissed => {
                notification.dismissed = true;
                true
            }
            _ => false,
        }
    }

    pub fn dismiss_all(&self) {
        for notification in self.entries().iter_mut() {
            notification.dismissed = true;
        }
    }

    /// Drops dismissed notifications. Returns how many were removed.
    pub fn prune_dismissed(&self) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|notification| !notification.dismissed);
        before - entries.len()
    }

    /// Drops non-persistent notifications older than `max_age`.
    pub fn expire_transient(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|notification| notification.persistent || notification.timestamp > cutoff);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

impl NotificationSink for NotificationCenter {
    fn push(&self, notification: Notification) {
        let mut entries = self.entries();
        if entries.len() >= self.capacity {
            match entries.iter().position(|existing| existing.dismissed) {
                Some(index) => {
                    entries.remove(index);
                }
                None => {
                    entries.pop_front();
                }
            }
        }
        entries.push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;

    #[test]
    fn push_and_dismiss() {
        let center = NotificationCenter::new();
        let failure = Notification::failure("save failed", None);
        let failure_id = failure.id.clone();
        center.push(Notification::success("loaded"));
        center.push(failure);

        assert_eq!(center.len(), 2);
        assert_eq!(center.persistent().len(), 1);

        assert!(center.dismiss(&failure_id));
        assert!(!center.dismiss(&failure_id));
        assert_eq!(center.active().len(), 1);
        assert_eq!(center.prune_dismissed(), 1);
        assert_eq!(center.all()[0].kind, NotificationKind::Success);
    }

    #[test]
    fn full_center_drops_dismissed_first() {
        let center = NotificationCenter::with_capacity(2);
        let first = Notification::info("first");
        let first_id = first.id.clone();
        center.push(first);
        center.push(Notification::info("second"));
        center.dismiss(&first_id);

        center.push(Notification::info("third"));
        let messages: Vec<String> = center.all().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["second", "third"]);

        center.push(Notification::info("fourth"));
        let messages: Vec<String> = center.all().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["third", "fourth"]);
    }

    #[test]
    fn expire_transient_keeps_persistent() {
        let center = NotificationCenter::new();
        let mut old_success = Notification::success("old");
        old_success.timestamp = Utc::now() - Duration::seconds(30);
        let mut old_failure = Notification::failure("old failure", None);
        old_failure.timestamp = Utc::now() - Duration::seconds(30);
        center.push(old_success);
        center.push(old_failure);
        center.push(Notification::success("fresh"));

        assert_eq!(center.expire_transient(Duration::seconds(5)), 1);
        let messages: Vec<String> = center.all().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["old failure", "fresh"]);
    }
}
