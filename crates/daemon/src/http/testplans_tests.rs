// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use igor_adapters::fake::FakeOrigin;
use igor_adapters::Inventory;
use igor_core::{SystemClock, Testplan};
use igor_engine::{HookRunner, JobCenter, JobCenterConfig};
use tower::ServiceExt;

use crate::http::router;
use crate::state::AppState;

fn empty_plan(name: &str) -> Testplan {
    Testplan {
        name: name.to_string(),
        description: "does nothing".to_string(),
        job_layouts: Vec::new(),
        variables: BTreeMap::new(),
    }
}

fn test_app() -> axum::Router {
    let mut inventory = Inventory::new();
    let mut plans = BTreeMap::new();
    plans.insert("plan-1".to_string(), empty_plan("plan-1"));
    inventory.plans.register(Arc::new(FakeOrigin::new("fake", plans)));

    let events = igor_engine::EventPublisher::new();
    let hooks = Arc::new(HookRunner::new(None, events));
    let dir = tempfile::tempdir().unwrap();
    let config = JobCenterConfig::new(dir.into_path());
    let center = JobCenter::new(SystemClock, hooks, config);

    let state = AppState::new(center, Arc::new(inventory), PathBuf::from("/tmp"), None);
    router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn list_includes_the_registered_plan() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/testplans").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["plan-1"]);
}

#[tokio::test]
async fn entity_of_unknown_plan_is_404() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/testplans/no-such-plan").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_starts_a_worker_and_status_can_be_polled() {
    let app = test_app();

    let submit_response = app.clone().oneshot(Request::builder().uri("/testplans/plan-1/submit?release=stable").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(submit_response.status(), StatusCode::OK);
    let submitted = body_json(submit_response).await;
    assert_eq!(submitted["name"], "plan-1");

    let status_response = app.oneshot(Request::builder().uri("/testplans/plan-1/status").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(status_response.status(), StatusCode::OK);
    let status = body_json(status_response).await;
    assert_eq!(status["name"], "plan-1");
}

#[tokio::test]
async fn status_of_unknown_plan_is_404() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/testplans/no-such-plan/status").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn abort_of_unknown_plan_is_404() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/testplans/no-such-plan/abort").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_rst_of_unknown_plan_is_404() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/testplans/no-such-plan/report").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
