use crate::core::{ItemId, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic name of a replayable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryActionKind {
    FetchAll,
    MutateOne,
    MutateMany,
}

impl fmt::Display for RetryActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FetchAll => "fetch_all",
            Self::MutateOne => "mutate_one",
            Self::MutateMany => "mutate_many",
        };
        write!(f, "{label}")
    }
}

/// An operation together with the exact arguments needed to re-invoke it.
pub enum RetryAction<R: Record> {
    FetchAll,
    MutateOne { id: ItemId, change: R::Change },
    MutateMany { updates: Vec<(ItemId, R::Change)> },
}

impl<R: Record> RetryAction<R> {
    pub fn kind(&self) -> RetryActionKind {
        match self {
            Self::FetchAll => RetryActionKind::FetchAll,
            Self::MutateOne { .. } => RetryActionKind::MutateOne,
            Self::MutateMany { .. } => RetryActionKind::MutateMany,
        }
    }
}

impl<R: Record> Clone for RetryAction<R> {
    fn clone(&self) -> Self {
        match self {
            Self::FetchAll => Self::FetchAll,
            Self::MutateOne { id, change } => Self::MutateOne {
                id: id.clone(),
                change: change.clone(),
            },
            Self::MutateMany { updates } => Self::MutateMany {
                updates: updates.clone(),
            },
        }
    }
}

impl<R: Record> fmt::Debug for RetryAction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchAll => f.write_str("FetchAll"),
            Self::MutateOne { id, .. } => f.debug_struct("MutateOne").field("id", id).finish(),
            Self::MutateMany { updates } => f
                .debug_struct("MutateMany")
                .field("updates", &updates.len())
                .finish(),
        }
    }
}

/// A deferred operation waiting to be replayed.
pub struct RetryEntry<R: Record> {
    /// Empty until the queue assigns one on enqueue.
    pub id: String,
    pub action: RetryAction<R>,
    pub description: String,
    pub enqueued_at: DateTime<Utc>,
    /// 1 for the first failure, bumped each time a replay fails again.
    pub attempt: u32,
}

impl<R: Record> RetryEntry<R> {
    pub fn new(action: RetryAction<R>, description: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            action,
            description: description.into(),
            enqueued_at: Utc::now(),
            attempt: 1,
        }
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt.max(1);
        self
    }

    pub fn kind(&self) -> RetryActionKind {
        self.action.kind()
    }
}

impl<R: Record> Clone for RetryEntry<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            action: self.action.clone(),
            description: self.description.clone(),
            enqueued_at: self.enqueued_at,
            attempt: self.attempt,
        }
    }
}

impl<R: Record> fmt::Debug for RetryEntry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryEntry")
            .field("id", &self.id)
            .field("action", &self.action)
            .field("description", &self.description)
            .field("enqueued_at", &self.enqueued_at)
            .field("attempt", &self.attempt)
            .finish()
    }
}
