use super::RemoteGateway;
use crate::core::{ItemId, Record, RemoteError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

const SIMULATED_FAILURE: &str = "simulated network failure";

/// Timing and failure behaviour of a [`SimulatedGateway`].
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Artificial latency applied before every call resolves.
    pub delay: Duration,

    /// Fail every call while set.
    pub fail: bool,
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the artificial latency
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the forced-failure flag
    pub fn fail(mut self, fail: bool) -> Self {
        self.fail = fail;
        self
    }
}

/// Number of calls received per operation, failed ones included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatewayCallCounts {
    pub fetch_all: u64,
    pub mutate_one: u64,
    pub mutate_many: u64,
}

#[derive(Default)]
struct CallCounters {
    fetch_all: AtomicU64,
    mutate_one: AtomicU64,
    mutate_many: AtomicU64,
}

type StampFn<R> = Box<dyn Fn(&mut R) + Send + Sync>;

/// In-memory stand-in for a remote service.
///
/// Holds the authoritative copy of every record, sleeps for the configured
/// delay on each call and fails on demand. An optional stamp hook runs on
/// every record the "server" writes, to model server-assigned fields.
pub struct SimulatedGateway<R: Record> {
    records: Mutex<HashMap<ItemId, R>>,
    config: Mutex<GatewayConfig>,
    forced_failures: AtomicU32,
    stamp: Option<StampFn<R>>,
    calls: CallCounters,
}

impl<R: Record> SimulatedGateway<R> {
    pub fn new(records: impl IntoIterator<Item = R>) -> Self {
        Self::with_config(records, GatewayConfig::default())
    }

    pub fn with_config(records: impl IntoIterator<Item = R>, config: GatewayConfig) -> Self {
        Self {
            records: Mutex::new(records.into_iter().map(|r| (r.id(), r)).collect()),
            config: Mutex::new(config),
            forced_failures: AtomicU32::new(0),
            stamp: None,
            calls: CallCounters::default(),
        }
    }

    /// Runs `stamp` on every record written by a successful mutation.
    pub fn with_stamp(mut self, stamp: impl Fn(&mut R) + Send + Sync + 'static) -> Self {
        self.stamp = Some(Box::new(stamp));
        self
    }

    fn records(&self) -> MutexGuard<'_, HashMap<ItemId, R>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn config(&self) -> MutexGuard<'_, GatewayConfig> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_failing(&self, fail: bool) {
        self.config().fail = fail;
    }

    pub fn set_delay(&self, delay: Duration) {
        self.config().delay = delay;
    }

    /// Fails the next `count` calls regardless of the failure flag.
    pub fn fail_next(&self, count: u32) {
        self.forced_failures.store(count, Ordering::SeqCst);
    }

    /// Server-side copy of a record.
    pub fn record(&self, id: &ItemId) -> Option<R> {
        self.records().get(id).cloned()
    }

    /// Adds or replaces a record on the server only.
    pub fn insert(&self, record: R) {
        self.records().insert(record.id(), record);
    }

    /// Deletes a record on the server only.
    pub fn remove(&self, id: &ItemId) -> Option<R> {
        self.records().remove(id)
    }

    pub fn call_counts(&self) -> GatewayCallCounts {
        GatewayCallCounts {
            fetch_all: self.calls.fetch_all.load(Ordering::SeqCst),
            mutate_one: self.calls.mutate_one.load(Ordering::SeqCst),
            mutate_many: self.calls.mutate_many.load(Ordering::SeqCst),
        }
    }

    async fn simulate_network(&self) -> Result<(), RemoteError> {
        let (delay, fail) = {
            let config = self.config();
            (config.delay, config.fail)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if fail {
            return Err(RemoteError::Transient(SIMULATED_FAILURE.to_string()));
        }
        let forced = self
            .forced_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if forced {
            return Err(RemoteError::Transient(SIMULATED_FAILURE.to_string()));
        }
        Ok(())
    }

    fn stamped(&self, current: &R, change: &R::Change) -> R {
        let mut updated = current.clone();
        updated.apply(change);
        if let Some(stamp) = &self.stamp {
            stamp(&mut updated);
        }
        updated
    }
}

#[async_trait]
impl<R: Record> RemoteGateway<R> for SimulatedGateway<R> {
    async fn fetch_all(&self) -> Result<Vec<R>, RemoteError> {
        self.calls.fetch_all.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;
        Ok(self.records().values().cloned().collect())
    }

    async fn mutate_one(&self, id: &ItemId, change: &R::Change) -> Result<R, RemoteError> {
        self.calls.mutate_one.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;

        let mut records = self.records();
        let Some(current) = records.get(id) else {
            return Err(RemoteError::NotFound(id.clone()));
        };
        let updated = self.stamped(current, change);
        records.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    async fn mutate_many(&self, updates: &[(ItemId, R::Change)]) -> Result<Vec<R>, RemoteError> {
        self.calls.mutate_many.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;

        let mut records = self.records();
        let mut staged = records.clone();
        let mut written = Vec::with_capacity(updates.len());
        for (id, change) in updates {
            let Some(current) = staged.get(id) else {
                return Err(RemoteError::NotFound(id.clone()));
            };
            let updated = self.stamped(current, change);
            staged.insert(id.clone(), updated.clone());
            written.push(updated);
        }
        *records = staged;
        Ok(written)
    }
}
