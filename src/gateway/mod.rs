pub mod simulated;

pub use simulated::{GatewayCallCounts, GatewayConfig, SimulatedGateway};

use crate::core::{ItemId, Record, RemoteError};
use async_trait::async_trait;

/// Remote side of a collection.
///
/// Implementations may take arbitrarily long and fail at any point; the
/// coordinator treats every call the same regardless of timing.
#[async_trait]
pub trait RemoteGateway<R: Record>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<R>, RemoteError>;

    /// Applies `change` to the remote record and returns its authoritative value.
    async fn mutate_one(&self, id: &ItemId, change: &R::Change) -> Result<R, RemoteError>;

    /// Applies every update or none of them.
    async fn mutate_many(&self, updates: &[(ItemId, R::Change)]) -> Result<Vec<R>, RemoteError>;
}
