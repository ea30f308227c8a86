use super::ItemId;
use thiserror::Error;

/// Failure reported by a [`RemoteGateway`](crate::gateway::RemoteGateway).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Remote record '{0}' not found")]
    NotFound(ItemId),

    #[error("Network error: {0}")]
    Transient(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Record '{0}' not found")]
    NotFound(ItemId),

    #[error("Remote operation failed: {0}")]
    TransientRemote(#[from] RemoteError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Operation already in flight for {0}")]
    InFlight(String),

    #[error("Retry entry '{0}' not found")]
    RetryNotFound(String),
}

impl SyncError {
    /// Returns `true` when the failure came from the remote side and was queued for replay.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::TransientRemote(_))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
