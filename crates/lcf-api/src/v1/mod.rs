use axum::Router;

use crate::{card, review, state::ApiState};

/// V1 API routes
pub fn routes() -> Router<ApiState> {
    Router::new().merge(card::routes()).merge(review::routes())
}
