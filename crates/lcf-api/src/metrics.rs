//! Prometheus metrics for request traffic and study activity.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use lcf_srs::{CardStatus, Outcome};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is a valid regex")
});

static NUMBER_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+").expect("number pattern is a valid regex"));

/// Initialize the Prometheus exporter and install it as the global recorder.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .set_buckets_for_metric(
            Matcher::Full("card_store_write_duration_seconds".to_string()),
            &[0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25],
        )?;

    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let in_flight = gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone());
    in_flight.increment(1.0);

    let response = next.run(req).await;

    in_flight.decrement(1.0);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Replace card ids in a URL path with `:id` to keep label cardinality low.
fn normalize_path(path: &str) -> String {
    let normalized = UUID_SEGMENT.replace_all(path, ":id");
    NUMBER_SEGMENT
        .replace_all(&normalized, "/:id")
        .into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record one graded card
pub fn record_review_event(outcome: Outcome, status: CardStatus) {
    counter!(
        "card_reviews_total",
        "outcome" => outcome.as_str(),
        "status" => status.as_str()
    )
    .increment(1);
}

/// Record a write of the card collection to storage
pub fn record_store_write(operation: &'static str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        "card_store_writes_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);

    histogram!(
        "card_store_write_duration_seconds",
        "operation" => operation
    )
    .record(duration_secs);
}

/// Run a storage write, timing it under `operation`.
pub fn timed_store_write<T, E>(
    operation: &'static str,
    write: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let start = Instant::now();
    let result = write();
    record_store_write(operation, start.elapsed().as_secs_f64(), result.is_ok());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/v1/cards/550e8400-e29b-41d4-a716-446655440000"),
            "/v1/cards/:id"
        );
        assert_eq!(normalize_path("/v1/cards/3/review"), "/v1/cards/:id/review");
        assert_eq!(
            normalize_path("/v1/cards/550e8400-e29b-41d4-a716-446655440000/review"),
            "/v1/cards/:id/review"
        );
        assert_eq!(normalize_path("/v1/stats"), "/v1/stats");
        assert_eq!(normalize_path("/health"), "/health");
    }

    #[test]
    fn test_timed_store_write_passes_result_through() {
        let ok: Result<u32, String> = timed_store_write("insert", || Ok(7));
        assert_eq!(ok, Ok(7));

        let failed: Result<u32, String> = timed_store_write("grade", || Err("disk full".to_string()));
        assert_eq!(failed, Err("disk full".to_string()));
    }

    #[tokio::test]
    async fn test_metrics_handler_renders() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let response = metrics_handler(State(handle)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
