use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates a CORS layer with configured allowed origins
///
/// # Arguments
/// * `allowed_origins` - List of allowed origin URLs as strings
///
/// # Returns
/// A configured `CorsLayer` with:
/// - Allowed origins parsed from the provided list (unparsable entries are skipped)
/// - The methods the card API uses (GET, POST, OPTIONS)
/// - Standard headers (Content-Type, Accept, X-Request-ID)
pub fn create_cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let origins = allowed_origins
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-request-id"),
        ])
}
