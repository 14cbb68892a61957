#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use fibber_api::backend::Backends;
use fibber_api::config::{BackendKind, ServerConfig};
use fibber_api::router::build_app_router;
use fibber_api::state::AppState;
use fibber_core::error::CoreError;
use fibber_core::job::{AcceptedJob, JobIndex, SlotValue};
use fibber_core::ports::{EventChannel, JobLog, Snapshot, StateStore, Subscription};
use fibber_worker::{ComputationWorker, WorkerStats};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        backend: BackendKind::Memory,
    }
}

/// Build the full application router over the given backends, using the
/// same middleware stack as production.
pub fn build_test_app(backends: &Backends) -> Router {
    let config = test_config();
    let state = AppState::new(config.clone(), backends);
    build_app_router(state, &config)
}

/// Subscribe a worker to the backends' channel and run it in the background.
pub async fn spawn_worker(backends: &Backends) -> (CancellationToken, JoinHandle<WorkerStats>) {
    let subscription = backends.channel.subscribe().await.unwrap();
    let worker = ComputationWorker::new(Arc::clone(&backends.store));
    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        let channel = Arc::clone(&backends.channel);
        async move { worker.run_forever(channel, subscription, cancel).await }
    });
    (cancel, handle)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST `/values` with `{ "index": index }`.
pub async fn submit(app: Router, index: &str) -> Response<Body> {
    post_json(app, "/values", serde_json::json!({ "index": index })).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// GET `/values/current` and return the parsed map.
pub async fn current(app: Router) -> serde_json::Value {
    let response = get(app, "/values/current").await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// GET `/values/all` and return the submitted numbers.
pub async fn all_numbers(app: Router) -> Vec<i64> {
    let response = get(app, "/values/all").await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["number"].as_i64().unwrap())
        .collect()
}

/// Poll `/values/current` until `key` holds `expected`.
pub async fn wait_for_value(app: Router, key: &str, expected: &str) {
    let poll = async {
        loop {
            let snapshot = current(app.clone()).await;
            if snapshot[key] == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(30), poll)
        .await
        .unwrap_or_else(|_| panic!("key {key} never reached {expected}"));
}

// ---------------------------------------------------------------------------
// Failure-injecting backends
// ---------------------------------------------------------------------------

/// State store whose every call fails.
pub struct DownStore;

#[async_trait]
impl StateStore for DownStore {
    async fn set(&self, _index: JobIndex, _value: SlotValue) -> Result<(), CoreError> {
        Err(CoreError::StoreUnavailable("redis: connection refused".into()))
    }

    async fn snapshot(&self) -> Result<Snapshot, CoreError> {
        Err(CoreError::StoreUnavailable("redis: connection refused".into()))
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Err(CoreError::StoreUnavailable("redis: connection refused".into()))
    }
}

/// Job log whose every call fails.
pub struct DownLog;

#[async_trait]
impl JobLog for DownLog {
    async fn append(&self, _index: JobIndex) -> Result<(), CoreError> {
        Err(CoreError::LogUnavailable("postgres: password authentication failed".into()))
    }

    async fn list(&self) -> Result<Vec<AcceptedJob>, CoreError> {
        Err(CoreError::LogUnavailable("postgres: password authentication failed".into()))
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Err(CoreError::LogUnavailable("postgres: password authentication failed".into()))
    }
}

/// Event channel whose every call fails.
pub struct DownChannel;

#[async_trait]
impl EventChannel for DownChannel {
    async fn publish(&self, _index: JobIndex) -> Result<usize, CoreError> {
        Err(CoreError::ChannelUnavailable("redis: broken pipe".into()))
    }

    async fn subscribe(&self) -> Result<Subscription, CoreError> {
        Err(CoreError::ChannelUnavailable("redis: broken pipe".into()))
    }
}
