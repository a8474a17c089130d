use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode, header};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use assistant_gateway::app;
use assistant_gateway::rate_limit::RateLimiter;
use assistant_gateway::state::AppState;

fn test_app() -> Router {
    let state = Arc::new(AppState {
        client: reqwest::Client::new(),
        groq_url: "http://127.0.0.1:9".to_string(),
        model: "test-model".to_string(),
        api_key: None,
        chat_limiter: RateLimiter::new(5, Duration::from_secs(60)),
        emoji_limiter: RateLimiter::new(1, Duration::from_secs(10)),
    });
    app(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4242))))
}

fn emoji_request(forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/api/emoji");
    if let Some(value) = forwarded_for {
        builder = builder.header("x-forwarded-for", value);
    }
    builder.body(Body::empty()).unwrap()
}

fn chat_request(forwarded_for: &str, message: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("x-forwarded-for", forwarded_for)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "message": message }).to_string(),
        ))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn emoji_second_request_is_rejected_with_retry_after() {
    let app = test_app();

    let first = app
        .clone()
        .oneshot(emoji_request(Some("1.2.3.4")))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let body = body_json(first).await;
    assert!(body["emoji"].is_string());
    assert!(body["generatedAt"].is_string());

    let second = app
        .clone()
        .oneshot(emoji_request(Some("1.2.3.4")))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.headers().get(header::RETRY_AFTER).unwrap(), "10");
    let body = body_json(second).await;
    assert_eq!(body["message"], "Wait 10 seconds before generating again.");
}

#[tokio::test]
async fn emoji_guard_isolates_client_keys() {
    let app = test_app();

    let first = app
        .clone()
        .oneshot(emoji_request(Some("1.2.3.4")))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let denied = app
        .clone()
        .oneshot(emoji_request(Some("1.2.3.4")))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);

    // another forwarded key is unaffected
    let other = app
        .clone()
        .oneshot(emoji_request(Some("5.6.7.8")))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);

    // no header falls back to the peer address, a third key
    let peer = app.clone().oneshot(emoji_request(None)).await.unwrap();
    assert_eq!(peer.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_sixth_request_in_window_is_rejected() {
    let app = test_app();

    // empty messages are admitted (and counted) before validation kicks in
    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(chat_request("1.2.3.4", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid message.");
    }

    let sixth = app
        .clone()
        .oneshot(chat_request("1.2.3.4", ""))
        .await
        .unwrap();
    assert_eq!(sixth.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(sixth.headers().get(header::RETRY_AFTER).unwrap(), "60");
    let body = body_json(sixth).await;
    assert_eq!(
        body["message"],
        "Limit of 5 questions per minute reached. Try again in 60 seconds."
    );
}

#[tokio::test]
async fn chat_reports_missing_api_key_after_admission() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(chat_request("1.2.3.4", "hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "GROQ_API_KEY is not set on the server.");
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}
