//! Read-only accessors over the job log and the state store.

use std::sync::Arc;

use serde::Serialize;

use fibber_core::error::CoreError;
use fibber_core::job::AcceptedJob;
use fibber_core::ports::{JobLog, Snapshot, StateStore};

/// Reachability of each backend, for the health endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BackendHealth {
    pub store_healthy: bool,
    pub log_healthy: bool,
}

impl BackendHealth {
    pub fn all_healthy(&self) -> bool {
        self.store_healthy && self.log_healthy
    }
}

/// Exposes the job log and the state store without modifying either.
pub struct QuerySurface {
    store: Arc<dyn StateStore>,
    log: Arc<dyn JobLog>,
}

impl QuerySurface {
    pub fn new(store: Arc<dyn StateStore>, log: Arc<dyn JobLog>) -> Self {
        Self { store, log }
    }

    /// Every accepted submission, duplicates included.
    pub async fn list_accepted(&self) -> Result<Vec<AcceptedJob>, CoreError> {
        self.log.list().await
    }

    /// The state store as it is right now, placeholders and results mixed.
    pub async fn current_snapshot(&self) -> Result<Snapshot, CoreError> {
        self.store.snapshot().await
    }

    pub async fn health(&self) -> BackendHealth {
        let (store, log) = tokio::join!(self.store.ping(), self.log.ping());
        BackendHealth {
            store_healthy: store.is_ok(),
            log_healthy: log.is_ok(),
        }
    }
}
