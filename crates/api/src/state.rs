use std::sync::Arc;

use crate::backend::Backends;
use crate::config::ServerConfig;
use crate::gateway::SubmissionGateway;
use crate::query::QuerySurface;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Write path for new jobs.
    pub gateway: Arc<SubmissionGateway>,
    /// Read path over the job log and state store.
    pub queries: Arc<QuerySurface>,
}

impl AppState {
    /// Wire the gateway and query surface to the given backend handles.
    pub fn new(config: ServerConfig, backends: &Backends) -> Self {
        Self {
            config: Arc::new(config),
            gateway: Arc::new(SubmissionGateway::new(
                Arc::clone(&backends.store),
                Arc::clone(&backends.channel),
                Arc::clone(&backends.log),
            )),
            queries: Arc::new(QuerySurface::new(
                Arc::clone(&backends.store),
                Arc::clone(&backends.log),
            )),
        }
    }
}
