pub mod center;
pub mod log_sink;

pub use center::NotificationCenter;
pub use log_sink::LogSink;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.pad(label)
    }
}

/// A human-readable event handed to a [`NotificationSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    /// Persistent notifications stay until dismissed; others may expire.
    pub persistent: bool,
    pub dismissed: bool,
    pub timestamp: DateTime<Utc>,
    /// Retry queue entry that replays the failed operation, if any.
    pub retry_entry_id: Option<String>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, persistent: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            message: message.into(),
            persistent,
            dismissed: false,
            timestamp: Utc::now(),
            retry_entry_id: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message, false)
    }

    /// Transient error, used for rejected calls that changed nothing.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message, false)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, message, false)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message, false)
    }

    /// Persistent error for a failed remote operation.
    pub fn failure(message: impl Into<String>, retry_entry_id: Option<String>) -> Self {
        Self {
            retry_entry_id,
            ..Self::new(NotificationKind::Error, message, true)
        }
    }

    pub fn can_retry(&self) -> bool {
        self.retry_entry_id.is_some()
    }
}

/// Receives notifications from the coordinator.
///
/// `push` is fire-and-forget: implementations must not block and must never
/// call back into the coordinator.
pub trait NotificationSink: Send + Sync {
    fn push(&self, notification: Notification);
}
