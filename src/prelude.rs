//! Recommended imports grouped by role.
//!
//! `app` is what display/application code needs to drive a coordinator.
//! `testing` adds the in-memory gateway and notification store.

pub mod app {
    //! Coordinator surface for application code.
    pub use crate::{
        CollectionStatus, CoordinatorConfig, ItemId, Notification, NotificationKind,
        NotificationSink, OperationStatus, OptimisticCoordinator, Record, RemoteGateway,
        RetryEntry, SyncError,
    };
}

pub mod testing {
    //! Doubles for exercising a coordinator without a real remote side.
    pub use super::app::*;
    pub use crate::{GatewayConfig, NotificationCenter, SimulatedGateway};
}
