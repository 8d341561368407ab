//! Integration tests for the HTTP surface, driven through the axum router
//! without binding a socket.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use presence_board::day::DayKey;
use presence_board::http::{router, INTERACTIONS_PATH};
use presence_board::models::status::WorkStatus;
use presence_board::persistence::status_repo::StatusRepo;

use super::test_helpers::{click, test_state, webhook_body, FakeSlack, CHANNEL};

fn form_post(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(INTERACTIONS_PATH)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("request")
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
async fn click_on_todays_board_is_acknowledged() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    let state = test_state(Arc::clone(&slack)).await;
    let today = DayKey::today(state.config.utc_offset_hours).expect("today");

    let payload = click("U1", "office", today);
    let response = router(Arc::clone(&state))
        .oneshot(form_post(webhook_body(&payload)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "All Complete");

    let record = StatusRepo::new(Arc::clone(&state.db))
        .find("U1", CHANNEL, today)
        .await
        .expect("find");
    assert_eq!(record.map(|r| r.status), Some(WorkStatus::Office));
}

#[tokio::test]
async fn get_is_rejected_with_allow_header() {
    let state = test_state(FakeSlack::new()).await;

    let response = router(state)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(INTERACTIONS_PATH)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get(header::ALLOW).expect("allow header"),
        "POST"
    );
    let body: Value = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(body["message"], "Method not allowed");
}

#[tokio::test]
async fn invalid_payload_json_returns_500() {
    let state = test_state(FakeSlack::new()).await;

    let response = router(state)
        .oneshot(form_post(webhook_body("{oops")))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(body["message"], "Internal Server Error");
}

#[tokio::test]
async fn missing_payload_field_returns_500() {
    let state = test_state(FakeSlack::new()).await;

    let response = router(state)
        .oneshot(form_post("other=1".to_owned()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn non_form_body_returns_json_500() {
    let state = test_state(FakeSlack::new()).await;
    let today = DayKey::today(state.config.utc_offset_hours).expect("today");

    let response = router(Arc::clone(&state))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(INTERACTIONS_PATH)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(click("U1", "office", today)))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(body["message"], "Internal Server Error");
    assert!(body["error"]
        .as_str()
        .expect("error")
        .starts_with("payload:"));

    let record = StatusRepo::new(Arc::clone(&state.db))
        .find("U1", CHANNEL, today)
        .await
        .expect("find");
    assert!(record.is_none());
}

#[tokio::test]
async fn store_failure_returns_500() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    let state = test_state(Arc::clone(&slack)).await;
    let today = DayKey::today(state.config.utc_offset_hours).expect("today");
    state.db.close().await;

    let payload = click("U1", "office", today);
    let response = router(state)
        .oneshot(form_post(webhook_body(&payload)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn slack_outage_is_still_acknowledged() {
    let slack = FakeSlack::new();
    slack.fail_writes();
    let state = test_state(Arc::clone(&slack)).await;
    let today = DayKey::today(state.config.utc_offset_hours).expect("today");

    let payload = click("U1", "remote", today);
    let response = router(state)
        .oneshot(form_post(webhook_body(&payload)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_returns_ok() {
    let state = test_state(FakeSlack::new()).await;

    let response = router(state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}
