//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is designed to be shared via `Arc<EventBus>` between the
//! gateway and an in-process worker.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use fibber_core::error::CoreError;
use fibber_core::job::JobIndex;
use fibber_core::ports::{EventChannel, Subscription};

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus carrying raw index payloads.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every payload published after they subscribed.
pub struct EventBus {
    sender: broadcast::Sender<String>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed payloads are dropped
    /// and slow receivers skip past them.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a raw payload to all current subscribers.
    ///
    /// Returns the number of receivers; zero means the payload is gone.
    pub fn publish_raw(&self, payload: impl Into<String>) -> usize {
        // SendError only means there are zero receivers.
        self.sender.send(payload.into()).unwrap_or(0)
    }

    /// Subscribe to the underlying broadcast channel.
    pub fn receiver(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl EventChannel for EventBus {
    async fn publish(&self, index: JobIndex) -> Result<usize, CoreError> {
        Ok(self.publish_raw(index.key()))
    }

    async fn subscribe(&self) -> Result<Subscription, CoreError> {
        let stream = BroadcastStream::new(self.receiver()).filter_map(|item| async move {
            match item {
                Ok(payload) => Some(payload),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event bus subscriber lagged, payloads dropped");
                    None
                }
            }
        });
        Ok(stream.boxed())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(n: i64) -> JobIndex {
        JobIndex::new(n).unwrap()
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut sub = bus.subscribe().await.unwrap();

        let delivered = bus.publish(idx(12)).await.unwrap();
        assert_eq!(delivered, 1);

        let payload = sub.next().await.expect("should receive the payload");
        assert_eq!(payload, "12");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_payload() {
        let bus = EventBus::default();
        let mut sub1 = bus.subscribe().await.unwrap();
        let mut sub2 = bus.subscribe().await.unwrap();

        assert_eq!(bus.publish(idx(3)).await.unwrap(), 2);

        assert_eq!(sub1.next().await.as_deref(), Some("3"));
        assert_eq!(sub2.next().await.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_is_lost() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(idx(5)).await.unwrap(), 0);

        // A late subscriber never sees the earlier payload.
        let mut sub = bus.subscribe().await.unwrap();
        bus.publish_raw("6");
        assert_eq!(sub.next().await.as_deref(), Some("6"));
    }

    #[tokio::test]
    async fn payloads_arrive_in_publish_order() {
        let bus = EventBus::default();
        let mut sub = bus.subscribe().await.unwrap();

        for n in [4, 1, 9] {
            bus.publish(idx(n)).await.unwrap();
        }

        assert_eq!(sub.next().await.as_deref(), Some("4"));
        assert_eq!(sub.next().await.as_deref(), Some("1"));
        assert_eq!(sub.next().await.as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn subscription_ends_when_bus_dropped() {
        let bus = EventBus::default();
        let mut sub = bus.subscribe().await.unwrap();
        drop(bus);

        assert!(sub.next().await.is_none());
    }

    #[tokio::test]
    async fn lagged_subscriber_skips_overflowed_payloads() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe().await.unwrap();

        for payload in ["1", "2", "3", "4"] {
            bus.publish_raw(payload);
        }

        assert_eq!(sub.next().await.as_deref(), Some("3"));
        assert_eq!(sub.next().await.as_deref(), Some("4"));
    }
}
