use crate::common::{TestClient, TestStateBuilder};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use lcf_api::router;
use serde_json::Value;

fn full_app(production: bool) -> TestClient {
    let builder = TestStateBuilder::new();
    let builder = if production { builder.production() } else { builder };

    TestClient::new(router::app(
        builder.build(),
        vec!["http://localhost:3000".to_string()],
        None,
    ))
}

#[tokio::test]
async fn test_health() {
    let client = full_app(false);

    client.get("/health").await.assert_status(StatusCode::OK);

    let ready = client.get("/health/ready").await;
    ready.assert_status(StatusCode::OK);
    let body: Value = ready.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["cards"], 5);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let client = full_app(false);

    let response = client.get("/v2/cards").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.error_message(),
        "The requested resource was not found"
    );
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let client = full_app(false);

    let response = client
        .request(
            Request::builder()
                .uri("/v1/stats")
                .header("X-Request-ID", "trace-me-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.headers.get("x-request-id").unwrap(), "trace-me-42");

    let generated = client.get("/v1/stats").await;
    assert!(generated.headers.get("x-request-id").is_some());
}

#[tokio::test]
async fn test_security_headers() {
    let development = full_app(false).get("/v1/cards").await;
    assert_eq!(
        development.headers.get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(development.headers.get("x-frame-options").unwrap(), "DENY");
    assert!(development.headers.get("strict-transport-security").is_none());

    let production = full_app(true).get("/v1/cards").await;
    assert!(production.headers.get("strict-transport-security").is_some());
}

#[tokio::test]
async fn test_cors_preflight() {
    let client = full_app(false);

    let response = client
        .request(
            Request::builder()
                .method("OPTIONS")
                .uri("/v1/cards")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(
        response
            .headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let client = full_app(false);

    client.get("/metrics").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_backed_state_persists_reviews() {
    let dir = tempfile::tempdir().unwrap();
    let config = lcf_api::ApiConfig::from_vars(vec![(
        "FLASHCARDS_DATA_DIR".to_string(),
        dir.path().display().to_string(),
    )])
    .unwrap();

    let state = lcf_api::ApiState::new(&config).unwrap();
    let client = TestClient::for_state(state);
    let cards: Value = client.get("/v1/cards").await.json();
    assert_eq!(cards.as_array().unwrap().len(), 5);

    client
        .post_json("/v1/cards/1/review", &serde_json::json!({ "outcome": "good" }))
        .await
        .assert_status(StatusCode::OK);

    let reopened = TestClient::for_state(lcf_api::ApiState::new(&config).unwrap());
    let card: Value = reopened.get("/v1/cards/1").await.json();
    assert_eq!(card["reviewCount"], 1);

    let cards: Value = reopened.get("/v1/cards").await.json();
    assert_eq!(cards.as_array().unwrap().len(), 5);
    assert!(dir.path().join("leetcode-flashcards.json").exists());
}
