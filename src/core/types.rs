use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical key for every record handled by the coordinator.
///
/// Keys are strings. Numeric ids must be converted explicitly through
/// `From<u64>`/`From<i64>`, which render the decimal form, so `2` and `"2"`
/// name the same record while `"02"` does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&ItemId> for ItemId {
    fn from(value: &ItemId) -> Self {
        value.clone()
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// Aggregate status of the collection as driven by bulk fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        };
        write!(f, "{label}")
    }
}

/// Status of a single tracked operation. `Idle` means nothing is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Error => "error",
        };
        write!(f, "{label}")
    }
}

/// A remotely-backed item the coordinator can edit optimistically.
///
/// `Clone` must produce an independent deep copy: the coordinator relies on
/// it to snapshot an item before applying a speculative change, and restores
/// that snapshot verbatim when the remote side rejects the change.
pub trait Record: Clone + Send + Sync + 'static {
    /// Proposed partial edit applied locally and sent to the remote side.
    type Change: Clone + Send + Sync + 'static;

    fn id(&self) -> ItemId;

    fn apply(&mut self, change: &Self::Change);

    /// Rejects structurally invalid changes before anything is applied.
    fn validate(_change: &Self::Change) -> std::result::Result<(), String> {
        Ok(())
    }
}
