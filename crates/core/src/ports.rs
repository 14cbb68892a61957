//! Contracts for the three externally owned resources.
//!
//! The gateway and the worker only ever talk to these traits. Each process
//! builds concrete handles at startup and shares them as `Arc<dyn ...>`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::CoreError;
use crate::job::{AcceptedJob, JobIndex, SlotValue};

/// Full contents of the state store: index key to raw stored value.
pub type Snapshot = BTreeMap<String, String>;

/// Raw channel payloads, in arrival order. Ends when the channel closes.
pub type Subscription = BoxStream<'static, String>;

/// Low-latency key-value store holding the current status of each job.
///
/// Last write wins; there is no versioning.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Overwrite the entry for `index`.
    async fn set(&self, index: JobIndex, value: SlotValue) -> Result<(), CoreError>;

    /// Read every entry as currently stored.
    async fn snapshot(&self) -> Result<Snapshot, CoreError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), CoreError>;
}

/// Append-only record of accepted submissions.
#[async_trait]
pub trait JobLog: Send + Sync {
    /// Append one row. Duplicates are kept.
    async fn append(&self, index: JobIndex) -> Result<(), CoreError>;

    /// Every row ever appended.
    async fn list(&self) -> Result<Vec<AcceptedJob>, CoreError>;

    async fn ping(&self) -> Result<(), CoreError>;
}

/// Best-effort broadcast topic for newly accepted indices.
///
/// Delivery reaches only subscribers connected at publish time. Nothing is
/// queued or replayed.
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// Publish `index`, returning how many subscribers received it.
    async fn publish(&self, index: JobIndex) -> Result<usize, CoreError>;

    /// Start receiving payloads published from now on.
    async fn subscribe(&self) -> Result<Subscription, CoreError>;
}
