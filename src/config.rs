/// Coordinator configuration
///
/// Labels are only used to build human-readable notification messages and
/// retry descriptions.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Singular noun for one record ("bookmark")
    pub item_label: String,

    /// Plural noun for the collection ("bookmarks")
    pub collection_label: String,

    /// Push a transient notification for every successful operation
    pub notify_on_success: bool,

    /// Maximum number of queued retries; the oldest is evicted beyond this
    pub max_retry_entries: Option<usize>,

    /// Attempt number after which a failure is reported but not re-queued
    pub max_retry_attempts: Option<u32>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            item_label: "record".to_string(),
            collection_label: "records".to_string(),
            notify_on_success: true,
            max_retry_entries: None,
            max_retry_attempts: None,
        }
    }
}

impl CoordinatorConfig {
    /// Create a configuration with default labels and unbounded retries
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the singular and plural labels
    pub fn labels(mut self, item: &str, collection: &str) -> Self {
        self.item_label = item.to_string();
        self.collection_label = collection.to_string();
        self
    }

    /// Enable or disable success notifications
    pub fn notify_on_success(mut self, enabled: bool) -> Self {
        self.notify_on_success = enabled;
        self
    }

    /// Bound the retry queue
    pub fn max_retry_entries(mut self, max: usize) -> Self {
        self.max_retry_entries = Some(max.max(1));
        self
    }

    /// Stop re-queueing after `attempts` failed attempts of one operation
    pub fn max_retry_attempts(mut self, attempts: u32) -> Self {
        self.max_retry_attempts = Some(attempts.max(1));
        self
    }

    /// Returns `true` when a failure on `attempt` should be queued for replay.
    pub(crate) fn allows_retry_after(&self, attempt: u32) -> bool {
        match self.max_retry_attempts {
            Some(max) => attempt < max,
            None => true,
        }
    }
}
