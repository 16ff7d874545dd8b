use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use lcf_store::Card;
use validator::Validate;

use crate::{ApiState, error::ApiError, metrics, validation::parse_card_filter};

use super::model::{CardListQuery, CreateCardRequest, ReviewRequest, ReviewResponse};

/// Create the card routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/cards", get(list_cards).post(create_card))
        .route("/cards/{id}", get(get_card))
        .route("/cards/{id}/review", post(review_card))
}

/// List cards, optionally filtered by difficulty, status and due date
async fn list_cards(
    State(state): State<ApiState>,
    query: Result<Query<CardListQuery>, QueryRejection>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let Query(query) = query?;
    let filter = parse_card_filter(
        query.difficulty.as_deref(),
        query.status.as_deref(),
        query.date.as_deref(),
    )?;

    let now = state.now();
    let cards = if filter.is_empty() {
        state.repository.all()?
    } else {
        state.repository.filter(&filter, &now.timezone())?
    };

    Ok(Json(cards))
}

/// Create a new card, due immediately
async fn create_card(
    State(state): State<ApiState>,
    payload: Result<Json<CreateCardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let payload = payload.trimmed();
    payload.validate()?;

    let now = state.now_utc();
    let new_card = payload.into_new_card();
    let card = state
        .write("insert", move |repository| repository.insert(new_card, now))
        .await?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// Get card by ID
async fn get_card(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    state
        .repository
        .find(&id)?
        .map(Json)
        .ok_or_else(|| card_not_found(&id))
}

/// Grade a card and reschedule it
async fn review_card(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let Json(ReviewRequest { outcome }) = payload?;

    let now = state.now();
    let graded = {
        let id = id.clone();
        state
            .write("grade", move |repository| repository.grade(&id, outcome, now))
            .await?
    };
    let (card, schedule) = graded.ok_or_else(|| card_not_found(&id))?;

    metrics::record_review_event(outcome, card.status);

    Ok(Json(ReviewResponse { card, schedule }))
}

fn card_not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Card not found: {id}"))
}
