//! The sequential consumer of the event channel.
//!
//! One payload at a time: parse, compute, overwrite the state store entry.
//! Failures are logged and the payload dropped; nothing is retried.
//! A subscription that ends without cancellation is replaced by a new one.

use std::fmt;
use std::ops::AddAssign;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use fibber_core::error::CoreError;
use fibber_core::job::{JobIndex, SlotValue};
use fibber_core::ports::{EventChannel, StateStore, Subscription};

/// Pause between attempts to resubscribe after the channel closed.
const DEFAULT_RESUBSCRIBE_DELAY: Duration = Duration::from_secs(1);

/// Why a single payload was dropped.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Malformed message payload '{payload}': {reason}")]
    MalformedMessage { payload: String, reason: CoreError },

    #[error("Unable to store value {value} for index {index}: {source}")]
    ComputeStoreWriteFailure {
        index: JobIndex,
        value: u64,
        #[source]
        source: CoreError,
    },

    #[error("Computation for index {index} did not complete: {reason}")]
    ComputeFailed { index: JobIndex, reason: String },
}

/// The subscription ended while the worker was still expected to run.
#[derive(Debug, thiserror::Error)]
#[error("Event channel closed before shutdown ({stats})")]
pub struct ChannelClosed {
    pub stats: WorkerStats,
}

/// Counters reported when the loop exits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub processed: u64,
    pub dropped: u64,
}

impl AddAssign for WorkerStats {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.dropped += other.dropped;
    }
}

impl fmt::Display for WorkerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} processed, {} dropped", self.processed, self.dropped)
    }
}

/// Long-lived worker holding its own state store handle.
pub struct ComputationWorker {
    store: Arc<dyn StateStore>,
    resubscribe_delay: Duration,
}

impl ComputationWorker {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            resubscribe_delay: DEFAULT_RESUBSCRIBE_DELAY,
        }
    }

    pub fn with_resubscribe_delay(mut self, delay: Duration) -> Self {
        self.resubscribe_delay = delay;
        self
    }

    /// Run until `cancel` fires, resubscribing to `channel` whenever the
    /// current subscription ends.
    ///
    /// `subscription` is taken already open so the caller controls when the
    /// worker starts listening. Failed resubscribe attempts are retried after
    /// the resubscribe delay.
    pub async fn run_forever(
        &self,
        channel: Arc<dyn EventChannel>,
        mut subscription: Subscription,
        cancel: CancellationToken,
    ) -> WorkerStats {
        let mut total = WorkerStats::default();

        loop {
            match self.run(subscription, cancel.clone()).await {
                Ok(stats) => {
                    total += stats;
                    return total;
                }
                Err(ChannelClosed { stats }) => {
                    total += stats;
                    tracing::warn!("Event channel closed, resubscribing");
                }
            }

            subscription = match self.resubscribe(channel.as_ref(), &cancel).await {
                Some(subscription) => subscription,
                None => return total,
            };
        }
    }

    /// Retry `subscribe` until it succeeds or `cancel` fires.
    async fn resubscribe(&self, channel: &dyn EventChannel, cancel: &CancellationToken) -> Option<Subscription> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return None,
                _ = tokio::time::sleep(self.resubscribe_delay) => {}
            }

            match channel.subscribe().await {
                Ok(subscription) => {
                    tracing::info!("Resubscribed to event channel");
                    return Some(subscription);
                }
                Err(e) => tracing::warn!(error = %e, "Resubscribe failed, retrying"),
            }
        }
    }

    /// Consume `subscription` until it ends or `cancel` fires.
    ///
    /// Returns `Err` when the subscription ends first. A payload already
    /// being computed is finished before the loop observes cancellation.
    pub async fn run(
        &self,
        mut subscription: Subscription,
        cancel: CancellationToken,
    ) -> Result<WorkerStats, ChannelClosed> {
        let mut stats = WorkerStats::default();
        tracing::info!("Computation worker started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Computation worker shutting down");
                    break;
                }
                next = subscription.next() => {
                    let Some(payload) = next else {
                        tracing::warn!(%stats, "Event channel closed");
                        return Err(ChannelClosed { stats });
                    };
                    tracing::debug!(%payload, "New message");

                    match self.handle_payload(&payload).await {
                        Ok(_) => stats.processed += 1,
                        Err(e) => {
                            tracing::error!(error = %e, %payload, "Dropping message");
                            stats.dropped += 1;
                        }
                    }
                }
            }
        }

        tracing::info!(
            processed = stats.processed,
            dropped = stats.dropped,
            "Computation worker stopped",
        );
        Ok(stats)
    }

    /// Process one raw payload end to end. Returns the stored slot.
    pub async fn handle_payload(&self, payload: &str) -> Result<(JobIndex, SlotValue), WorkerError> {
        let index = JobIndex::parse(payload).map_err(|reason| WorkerError::MalformedMessage {
            payload: payload.to_string(),
            reason,
        })?;

        // Keep the exponential computation off the async executor threads.
        let value = tokio::task::spawn_blocking(move || index.compute())
            .await
            .map_err(|e| WorkerError::ComputeFailed {
                index,
                reason: e.to_string(),
            })?;

        let slot = SlotValue::Ready(value);
        self.store
            .set(index, slot)
            .await
            .map_err(|source| WorkerError::ComputeStoreWriteFailure {
                index,
                value,
                source,
            })?;

        tracing::info!(%index, value, "Result stored");
        Ok((index, slot))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
