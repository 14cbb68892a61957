//! Partial-failure behavior of the submission gateway.
//!
//! Each backend is swapped for one that always fails, and the tests check
//! which earlier steps remain visible.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, build_test_app, submit, DownChannel, DownLog, DownStore};
use fibber_api::backend::Backends;
use fibber_cache::MemoryStateStore;
use fibber_core::job::{JobIndex, PLACEHOLDER_VALUE};
use fibber_core::ports::{EventChannel, JobLog};
use fibber_db::MemoryJobLog;
use fibber_events::EventBus;
use futures::StreamExt;

fn idx(n: i64) -> JobIndex {
    JobIndex::new(n).unwrap()
}

// ---------------------------------------------------------------------------
// Test: store failure aborts before anything else happens
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_failure_aborts_before_publish_and_append() {
    let bus = Arc::new(EventBus::default());
    let log = Arc::new(MemoryJobLog::new());
    let backends = Backends {
        store: Arc::new(DownStore),
        log: log.clone(),
        channel: bus.clone(),
    };
    let mut sub = bus.subscribe().await.unwrap();
    let app = build_test_app(&backends);

    let response = submit(app, "3").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json.to_string().contains("redis"), "backend details must not leak");

    assert!(log.list().await.unwrap().is_empty());
    let next = tokio::time::timeout(Duration::from_millis(50), sub.next()).await;
    assert!(next.is_err(), "nothing should have been published");
}

// ---------------------------------------------------------------------------
// Test: channel failure leaves the placeholder but no log row
// ---------------------------------------------------------------------------

#[tokio::test]
async fn channel_failure_leaves_orphaned_placeholder() {
    let store = Arc::new(MemoryStateStore::new());
    let log = Arc::new(MemoryJobLog::new());
    let backends = Backends {
        store: store.clone(),
        log: log.clone(),
        channel: Arc::new(DownChannel),
    };
    let app = build_test_app(&backends);

    let response = submit(app, "3").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.get(idx(3)).await.as_deref(), Some(PLACEHOLDER_VALUE));
    assert!(log.list().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: log failure happens after the worker was already notified
// ---------------------------------------------------------------------------

#[tokio::test]
async fn log_failure_after_publish_still_notifies_worker() {
    let store = Arc::new(MemoryStateStore::new());
    let bus = Arc::new(EventBus::default());
    let backends = Backends {
        store: store.clone(),
        log: Arc::new(DownLog),
        channel: bus.clone(),
    };
    let mut sub = bus.subscribe().await.unwrap();
    let app = build_test_app(&backends);

    let response = submit(app, "3").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.get(idx(3)).await.as_deref(), Some(PLACEHOLDER_VALUE));
    assert_eq!(sub.next().await.as_deref(), Some("3"));
}

// ---------------------------------------------------------------------------
// Test: read failures surface as server errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn read_failures_are_server_errors() {
    let backends = Backends {
        store: Arc::new(DownStore),
        log: Arc::new(DownLog),
        channel: Arc::new(EventBus::default()),
    };
    let app = build_test_app(&backends);

    let all = common::get(app.clone(), "/values/all").await;
    assert_eq!(all.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let current = common::get(app, "/values/current").await;
    assert_eq!(current.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(current).await["error"], "An internal error occurred");
}
