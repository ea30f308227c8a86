use super::{Notification, NotificationKind, NotificationSink};
use log::{error, info, warn};

/// Forwards notifications to the `log` facade.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    target: Option<String>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
        }
    }
}

impl NotificationSink for LogSink {
    fn push(&self, notification: Notification) {
        let target = self.target.as_deref().unwrap_or(module_path!());
        let retry = notification
            .retry_entry_id
            .as_deref()
            .map(|id| format!(" (retry: {id})"))
            .unwrap_or_default();
        match notification.kind {
            NotificationKind::Error => {
                error!(target: target, "{}{}", notification.message, retry)
            }
            NotificationKind::Warning => warn!(target: target, "{}", notification.message),
            NotificationKind::Success | NotificationKind::Info => {
                info!(target: target, "{}", notification.message)
            }
        }
    }
}
