// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use igor_adapters::Inventory;
use igor_core::SystemClock;
use igor_engine::{HookRunner, JobCenter, JobCenterConfig};
use tower::ServiceExt;

use super::router;
use crate::state::AppState;

fn test_state() -> AppState {
    let events = igor_engine::EventPublisher::new();
    let hooks = Arc::new(HookRunner::new(None, events));
    let config = JobCenterConfig::new(PathBuf::from("/tmp/igor-mod-test-sessions"));
    let center = JobCenter::new(SystemClock, hooks, config);
    AppState::new(center, Arc::new(Inventory::new()), PathBuf::from("/tmp"), None)
}

#[tokio::test]
async fn healthz_returns_ok() {
    let response = router(test_state()).oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn empty_job_list_renders() {
    let response = router(test_state()).oneshot(Request::builder().uri("/jobs").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_job_status_is_404() {
    let response = router(test_state()).oneshot(Request::builder().uri("/jobs/nonexistent/status").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
