// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use igor_adapters::fake::{fake_host_origin, fake_profile_origin, FakeHost, FakeProfile};
use igor_adapters::Inventory;
use igor_core::SystemClock;
use igor_engine::{HookRunner, JobCenter, JobCenterConfig};
use tower::ServiceExt;

use crate::http::router;
use crate::state::AppState;

fn test_app() -> axum::Router {
    let mut inventory = Inventory::new();
    inventory.hosts.register(Arc::new(fake_host_origin("fake", vec![Arc::new(FakeHost::new("host-1"))])));
    inventory.profiles.register(Arc::new(fake_profile_origin("fake", vec![Arc::new(FakeProfile::new("profile-1"))])));

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
async fn list_profiles_and_hosts_include_the_registered_entries() {
    let app = test_app();

    let profiles_response = app.clone().oneshot(Request::builder().uri("/profiles").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(profiles_response.status(), StatusCode::OK);
    let profiles = body_json(profiles_response).await;
    let names: Vec<&str> = profiles.as_array().unwrap().iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["profile-1"]);

    let hosts_response = app.oneshot(Request::builder().uri("/hosts").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(hosts_response.status(), StatusCode::OK);
    let hosts = body_json(hosts_response).await;
    let names: Vec<&str> = hosts.as_array().unwrap().iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["host-1"]);
}

#[tokio::test]
async fn kargs_round_trip_through_get_and_put() {
    let app = test_app();

    let put_response = app
        .clone()
        .oneshot(Request::builder().method("PUT").uri("/profiles/profile-1/kargs").body(Body::from("console=ttyS0")).unwrap())
        .await
        .unwrap();
    assert_eq!(put_response.status(), StatusCode::OK);

    let get_response = app.oneshot(Request::builder().uri("/profiles/profile-1/kargs").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(get_response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"console=ttyS0");
}

#[tokio::test]
async fn get_kargs_of_unknown_profile_is_404() {
    let app = test_app();
    let response = app.oneshot(Request::builder().uri("/profiles/no-such-profile/kargs").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn creating_a_profile_against_the_fixed_fake_origin_is_412() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().method("PUT").uri("/profiles/new-profile").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn deleting_a_registered_profile_succeeds() {
    let app = test_app();
    let response = app.oneshot(Request::builder().method("DELETE").uri("/profiles/profile-1").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_an_unknown_profile_is_404() {
    let app = test_app();
    let response = app.oneshot(Request::builder().method("DELETE").uri("/profiles/no-such-profile").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
