// ============================================================================
// optimo Library
// ============================================================================

pub mod core;
pub mod config;
pub mod state;
pub mod retry;
pub mod notify;
pub mod gateway;
pub mod coordinator;
pub mod prelude;

// Re-export main types for convenience
pub use core::{
    CollectionStatus, ItemId, OperationStatus, Record, RemoteError, Result, SyncError,
};
pub use config::CoordinatorConfig;
pub use state::{AsyncCollectionState, Items, OperationRecord, OperationTracker};
pub use retry::{RetryAction, RetryActionKind, RetryEntry, RetryQueue};
pub use notify::{LogSink, Notification, NotificationCenter, NotificationKind, NotificationSink};
pub use gateway::{GatewayCallCounts, GatewayConfig, RemoteGateway, SimulatedGateway};

// Re-export the coordinator API
pub use coordinator::{
    BulkOperation, CoordinatorSnapshot, OperationView, OptimisticCoordinator, RetrySummary,
    RetryView,
};
