use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use chrono::{DateTime, FixedOffset, Utc};
use http_body_util::BodyExt;
use lcf_api::{clock::FixedClock, config::Environment, router, state::ApiState};
use lcf_store::CardRepository;
use serde::Deserialize;
use tower::ServiceExt;

/// Sunday 2024-03-10, 14:00 UTC
pub const NOW: &str = "2024-03-10T14:00:00+00:00";

pub fn instant(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).expect("Invalid test instant")
}

/// Test state builder: in-memory storage and a frozen clock
pub struct TestStateBuilder {
    now: DateTime<FixedOffset>,
    repository: Option<CardRepository>,
    seed: bool,
    environment: Environment,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            now: instant(NOW),
            repository: None,
            seed: true,
            environment: Environment::Development,
        }
    }

    pub fn at(mut self, now: &str) -> Self {
        self.now = instant(now);
        self
    }

    /// Start from an empty collection instead of the sample cards
    pub fn empty(mut self) -> Self {
        self.seed = false;
        self
    }

    /// Share an existing repository, e.g. to observe it at another instant
    pub fn with_repository(mut self, repository: CardRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn production(mut self) -> Self {
        self.environment = Environment::Production;
        self
    }

    pub fn build(self) -> ApiState {
        let repository = match self.repository {
            Some(repository) => repository,
            None => {
                let repository =
                    lcf_store::open_memory_repository().expect("Failed to open repository");
                if self.seed {
                    repository
                        .seed_if_empty(self.now.with_timezone(&Utc))
                        .expect("Failed to seed repository");
                }
                repository
            }
        };

        ApiState::with_clock(repository, Arc::new(FixedClock(self.now)), self.environment)
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Client over the bare API routes
    pub fn for_state(state: ApiState) -> Self {
        Self::new(router::router().with_state(state))
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");
        self.post_raw(uri, &json_body).await
    }

    /// Send a POST request with a raw JSON content type body
    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// The `error` message of a JSON error body
    pub fn error_message(&self) -> String {
        let body: serde_json::Value = self.json();
        body["error"]
            .as_str()
            .expect("Response has no error message")
            .to_string()
    }
}
