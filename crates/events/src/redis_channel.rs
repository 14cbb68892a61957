//! Event channel over Redis pub/sub.

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use fibber_core::config::RedisConfig;
use fibber_core::error::CoreError;
use fibber_core::job::JobIndex;
use fibber_core::ports::{EventChannel, Subscription};

use crate::INSERT_TOPIC;

/// [`EventChannel`] publishing on a Redis topic.
///
/// Publishing shares a multiplexed connection; each subscription opens its
/// own dedicated pub/sub connection, as Redis requires.
#[derive(Clone)]
pub struct RedisChannel {
    client: redis::Client,
    conn: ConnectionManager,
    topic: String,
}

impl RedisChannel {
    /// Connect to Redis and PING it.
    pub async fn connect(config: &RedisConfig) -> redis::RedisResult<Self> {
        let client = redis::Client::open(config.url())?;
        let mut conn = ConnectionManager::new(client.clone()).await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(Self {
            client,
            conn,
            topic: INSERT_TOPIC.to_string(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

fn unavailable(err: redis::RedisError) -> CoreError {
    CoreError::ChannelUnavailable(err.to_string())
}

#[async_trait]
impl EventChannel for RedisChannel {
    async fn publish(&self, index: JobIndex) -> Result<usize, CoreError> {
        let mut conn = self.conn.clone();
        let receivers: usize = conn
            .publish(&self.topic, index.key())
            .await
            .map_err(unavailable)?;
        Ok(receivers)
    }

    async fn subscribe(&self) -> Result<Subscription, CoreError> {
        let mut pubsub = self.client.get_async_pubsub().await.map_err(unavailable)?;
        pubsub.subscribe(&self.topic).await.map_err(unavailable)?;
        tracing::info!(topic = %self.topic, "Subscribed to Redis topic");

        // Non-UTF-8 bytes survive as replacement characters and are rejected
        // by the consumer's parser.
        let stream = pubsub
            .into_on_message()
            .map(|msg| String::from_utf8_lossy(msg.get_payload_bytes()).into_owned());
        Ok(stream.boxed())
    }
}
