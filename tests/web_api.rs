// HTTP boundary tests: requests go through the real router via
// tower::ServiceExt::oneshot, with the keyword producer behind it.

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use moderationkit::moderation::models::ModeratorConfig;
use moderationkit::moderation::Moderator;
use moderationkit::signals::keyword::KeywordProducer;
use moderationkit::web::{build_router, AppState, SERVICE_NAME, VERSION};

fn app() -> axum::Router {
    let moderator = Moderator::new(ModeratorConfig::default(), vec![Arc::new(KeywordProducer)]);
    build_router(AppState { moderator })
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/moderate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_service_identity() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], SERVICE_NAME);
    assert_eq!(json["version"], VERSION);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn moderate_returns_result_envelope() {
    let (status, json) = send(post_json(serde_json::json!({
        "content": "Contact me on WhatsApp for $5 full project",
        "platform": "upwork",
        "userId": "u-42",
    })))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["metadata"]["version"], VERSION);
    assert!(json["metadata"]["timestamp"].is_string());

    let data = &json["data"];
    assert_eq!(data["isAllowed"], false);
    assert_eq!(data["suggested_action"], "block");
    assert_eq!(data["categories"].as_object().unwrap().len(), 7);
    assert!(data["processing_time_ms"].is_u64());
    let flags: Vec<&str> = data["flagged_phrases"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(flags.contains(&"off-platform contact"));
}

#[tokio::test]
async fn platform_defaults_to_general() {
    let (status, json) = send(post_json(serde_json::json!({
        "content": "Thanks, this was helpful",
    })))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["isAllowed"], true);
    assert_eq!(json["data"]["suggested_action"], "allow");
}

#[tokio::test]
async fn blank_content_is_rejected() {
    let (status, json) = send(post_json(serde_json::json!({ "content": "   " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Content field is required and cannot be empty"
    );
}

#[tokio::test]
async fn missing_content_field_is_rejected() {
    let (status, json) = send(post_json(serde_json::json!({ "platform": "substack" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Content field is required and cannot be empty"
    );
}

#[tokio::test]
async fn oversized_content_is_rejected() {
    let (status, json) = send(post_json(serde_json::json!({
        "content": "a".repeat(10_001),
    })))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Content too long. Maximum 10,000 characters allowed."
    );
}

#[tokio::test]
async fn content_at_the_limit_is_accepted() {
    let (status, _) = send(post_json(serde_json::json!({
        "content": "é".repeat(10_000),
    })))
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_body_gets_an_example_payload() {
    let request = Request::builder()
        .method("POST")
        .uri("/moderate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Request body is required");
    assert_eq!(json["example"]["platform"], "substack");
}

#[tokio::test]
async fn unknown_platform_is_a_bad_request() {
    let (status, json) = send(post_json(serde_json::json!({
        "content": "hello",
        "platform": "myspace",
    })))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}
