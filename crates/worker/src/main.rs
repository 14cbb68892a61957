//! `fibber-worker` -- standalone computation worker.
//!
//! Subscribes to the Redis `insert` topic and writes each computed result
//! into the Redis `values` hash.
//!
//! # Environment variables
//!
//! | Variable     | Required | Description              |
//! |--------------|----------|--------------------------|
//! | `REDIS_HOST` | yes      | Redis hostname           |
//! | `REDIS_PORT` | yes      | Redis port               |

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fibber_cache::RedisStateStore;
use fibber_core::config::RedisConfig;
use fibber_core::ports::EventChannel;
use fibber_events::RedisChannel;
use fibber_worker::{shutdown_signal, ComputationWorker};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fibber_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting computation worker");

    let config = RedisConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    if let Err(e) = run(config).await {
        tracing::error!(error = %format!("{e:#}"), "Computation worker failed");
        std::process::exit(1);
    }
}

async fn run(config: RedisConfig) -> anyhow::Result<()> {
    let conn = fibber_cache::connect(&config)
        .await
        .context("failed to connect to Redis state store")?;
    let store = Arc::new(RedisStateStore::new(conn));

    let channel = RedisChannel::connect(&config)
        .await
        .context("failed to connect to Redis event channel")?;
    let subscription = channel
        .subscribe()
        .await
        .context("failed to subscribe to event channel")?;
    tracing::info!(host = %config.host, port = config.port, topic = channel.topic(), "Connected to Redis");
    let channel: Arc<dyn EventChannel> = Arc::new(channel);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    // Returns only on cancellation; dropped connections are resubscribed.
    ComputationWorker::new(store)
        .run_forever(channel, subscription, cancel)
        .await;
    Ok(())
}
