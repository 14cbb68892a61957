//! Construction of the store, log and channel handles at startup.

use std::sync::Arc;

use anyhow::Context;

use fibber_cache::{MemoryStateStore, RedisStateStore};
use fibber_core::config::{PostgresConfig, RedisConfig};
use fibber_core::ports::{EventChannel, JobLog, StateStore};
use fibber_db::{MemoryJobLog, PgJobLog};
use fibber_events::{EventBus, RedisChannel};

/// The three resource handles a gateway process holds for its lifetime.
#[derive(Clone)]
pub struct Backends {
    pub store: Arc<dyn StateStore>,
    pub log: Arc<dyn JobLog>,
    pub channel: Arc<dyn EventChannel>,
}

impl Backends {
    /// Fresh in-process store, log and broadcast bus.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStateStore::new()),
            log: Arc::new(MemoryJobLog::new()),
            channel: Arc::new(EventBus::default()),
        }
    }

    /// Connect to PostgreSQL and Redis, failing if any is unreachable.
    ///
    /// Applies pending migrations before returning.
    pub async fn connect(redis: &RedisConfig, postgres: &PostgresConfig) -> anyhow::Result<Self> {
        let pool = fibber_db::create_pool(postgres)
            .await
            .context("failed to connect to database")?;
        tracing::info!("Database connection pool created");

        fibber_db::health_check(&pool)
            .await
            .context("database health check failed")?;
        tracing::info!("Database health check passed");

        fibber_db::run_migrations(&pool)
            .await
            .context("failed to run database migrations")?;
        tracing::info!("Database migrations applied");

        let conn = fibber_cache::connect(redis)
            .await
            .context("failed to connect to Redis state store")?;
        let channel = RedisChannel::connect(redis)
            .await
            .context("failed to connect to Redis event channel")?;
        tracing::info!(host = %redis.host, port = redis.port, "Redis connections established");

        Ok(Self {
            store: Arc::new(RedisStateStore::new(conn)),
            log: Arc::new(PgJobLog::new(pool)),
            channel: Arc::new(channel),
        })
    }
}
