pub mod collection;
pub mod tracker;

pub use collection::{AsyncCollectionState, Items};
pub use tracker::{OperationRecord, OperationTracker};
