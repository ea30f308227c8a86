pub mod action;
pub mod queue;

pub use action::{RetryAction, RetryActionKind, RetryEntry};
pub use queue::RetryQueue;
