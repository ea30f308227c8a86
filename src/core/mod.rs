pub mod error;
pub mod types;

pub use error::{RemoteError, Result, SyncError};
pub use types::{CollectionStatus, ItemId, OperationStatus, Record};
