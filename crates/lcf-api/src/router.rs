use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::{
    error::ApiError,
    metrics::{metrics_handler, track_metrics},
    middleware::{
        cors::create_cors_layer, request_id::request_id_middleware,
        security_headers::apply_security_headers,
    },
    state::ApiState,
    v1,
};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/v1", v1::routes())
        .fallback(handler_404)
}

/// The served application: routes, optional `/metrics` and the middleware stack.
pub fn app(
    state: ApiState,
    allowed_origins: Vec<String>,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let mut routes = router();
    if let Some(handle) = metrics_handle {
        routes = routes.merge(
            Router::new()
                .route("/metrics", get(metrics_handler))
                .with_state::<ApiState>(handle),
        );
    }

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let environment = state.environment;
    let app = routes
        .with_state(state)
        .layer(create_cors_layer(allowed_origins))
        .layer(trace_layer)
        .layer(middleware::from_fn(track_metrics))
        .layer(middleware::from_fn(request_id_middleware));

    apply_security_headers(app, environment)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Ready once the card collection can be read
async fn readiness(State(state): State<ApiState>) -> impl IntoResponse {
    match state.repository.len() {
        Ok(cards) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "cards": cards })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Card repository unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

async fn handler_404() -> ApiError {
    ApiError::NotFound("The requested resource was not found".to_string())
}
