//! State store on a single Redis hash.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use fibber_core::config::RedisConfig;
use fibber_core::error::CoreError;
use fibber_core::job::{JobIndex, SlotValue};
use fibber_core::ports::{Snapshot, StateStore};

/// Name of the Redis hash holding every job's current value.
pub const VALUES_HASH: &str = "values";

/// Open a multiplexed, auto-reconnecting connection and PING it.
pub async fn connect(config: &RedisConfig) -> redis::RedisResult<ConnectionManager> {
    let client = redis::Client::open(config.url())?;
    let mut conn = ConnectionManager::new(client).await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(conn)
}

/// [`StateStore`] backed by `HSET`/`HGETALL` on [`VALUES_HASH`].
///
/// The connection manager is cheap to clone and safe to share between
/// concurrent requests.
#[derive(Clone)]
pub struct RedisStateStore {
    conn: ConnectionManager,
    hash: String,
}

impl RedisStateStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            hash: VALUES_HASH.to_string(),
        }
    }
}

fn unavailable(err: redis::RedisError) -> CoreError {
    CoreError::StoreUnavailable(err.to_string())
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn set(&self, index: JobIndex, value: SlotValue) -> Result<(), CoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(&self.hash, index.key(), value.to_string())
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn snapshot(&self) -> Result<Snapshot, CoreError> {
        let mut conn = self.conn.clone();
        conn.hgetall(&self.hash).await.map_err(unavailable)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
