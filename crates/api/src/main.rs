//! `fibber-api` -- submission gateway and query surface over HTTP.
//!
//! In `external` mode the job log lives in PostgreSQL and the state store
//! and event channel in Redis; a separate `fibber-worker` process computes
//! results. In `memory` mode everything, worker included, runs here.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fibber_api::backend::Backends;
use fibber_api::config::{BackendKind, ServerConfig};
use fibber_api::router::build_app_router;
use fibber_api::state::AppState;
use fibber_core::config::{PostgresConfig, RedisConfig};
use fibber_worker::{shutdown_signal, ComputationWorker};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fibber_api=debug,fibber_worker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{e:#}"), "Gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // --- Configuration ---
    let config = ServerConfig::from_env().context("invalid server configuration")?;
    tracing::info!(host = %config.host, port = config.port, backend = ?config.backend, "Loaded server configuration");

    // --- Backends ---
    let backends = match config.backend {
        BackendKind::External => {
            let redis = RedisConfig::from_env().context("invalid Redis configuration")?;
            let postgres = PostgresConfig::from_env().context("invalid PostgreSQL configuration")?;
            Backends::connect(&redis, &postgres).await?
        }
        BackendKind::Memory => {
            tracing::info!("Using in-process store, log and event bus");
            Backends::in_memory()
        }
    };

    // --- In-process worker (memory mode only) ---
    let worker_cancel = CancellationToken::new();
    let worker_handle = if config.backend == BackendKind::Memory {
        let subscription = backends
            .channel
            .subscribe()
            .await
            .context("failed to subscribe in-process worker")?;
        let worker = ComputationWorker::new(backends.store.clone());
        let channel = backends.channel.clone();
        let cancel = worker_cancel.clone();
        Some(tokio::spawn(async move {
            worker.run_forever(channel, subscription, cancel).await
        }))
    } else {
        None
    };

    // --- Router ---
    let state = AppState::new(config.clone(), &backends);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let host: IpAddr = config.host.parse().context("invalid HOST address")?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(handle) = worker_handle {
        worker_cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("In-process worker stopped");
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}
