use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, post},
};
use chrono::Datelike;
use lcf_srs::{
    ReviewSchedule, ReviewStats, calculate_next_review, classify, due_within_week, is_due_today,
    month_calendar, review_stats,
};
use lcf_store::Card;

use crate::{
    ApiState,
    error::ApiError,
    validation::{validate_month, validate_year},
};

use super::model::{
    CalendarQuery, CalendarResponse, PreviewRequest, ScheduleResponse, TodaySession,
};

/// Create the scheduling and study routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/schedule", get(get_schedule))
        .route("/schedule/preview", post(preview_schedule))
        .route("/review/today", get(get_today_session))
        .route("/stats", get(get_stats))
        .route("/calendar", get(get_calendar))
}

/// Cards split into today / this week / future
async fn get_schedule(State(state): State<ApiState>) -> Result<Json<ScheduleResponse>, ApiError> {
    let cards = state.repository.all()?;
    Ok(Json(classify(&cards, &state.now()).into()))
}

/// Compute a schedule without touching any card
async fn preview_schedule(
    State(state): State<ApiState>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<ReviewSchedule>, ApiError> {
    let Json(request) = payload?;

    Ok(Json(calculate_next_review(
        request.outcome,
        request.interval,
        request.ease_factor,
        state.now(),
    )))
}

async fn get_today_session(State(state): State<ApiState>) -> Result<Json<TodaySession>, ApiError> {
    let now = state.now();
    let cards: Vec<Card> = state
        .repository
        .all()?
        .into_iter()
        .filter(|card| is_due_today(card.next_review, &now))
        .collect();

    tracing::debug!(due = cards.len(), "Built today's review session");

    Ok(Json(TodaySession {
        date: now.date_naive(),
        total: cards.len(),
        cards,
    }))
}

async fn get_stats(State(state): State<ApiState>) -> Result<Json<ReviewStats>, ApiError> {
    let cards = state.repository.all()?;
    Ok(Json(review_stats(&cards, &state.now())))
}

/// Month grid with per-day card counts
async fn get_calendar(
    State(state): State<ApiState>,
    query: Result<Query<CalendarQuery>, QueryRejection>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let Query(query) = query?;
    let now = state.now();

    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| now.month());
    validate_year(year)?;
    validate_month(month)?;

    let cards = state.repository.all()?;
    let days = month_calendar(&cards, year, month, &now)
        .ok_or_else(|| ApiError::Validation(format!("Invalid calendar month: {year}-{month}")))?;

    Ok(Json(CalendarResponse {
        year,
        month,
        days,
        due_today: cards
            .iter()
            .filter(|card| is_due_today(card.next_review, &now))
            .count(),
        due_within_week: due_within_week(&cards, &now),
    }))
}
