use chrono::NaiveDate;
use lcf_srs::{Buckets, CalendarDay, Outcome};
use lcf_store::Card;
use serde::{Deserialize, Serialize};

/// Body of `POST /v1/schedule/preview`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub outcome: Outcome,
    pub interval: Option<u32>,
    pub ease_factor: Option<f64>,
}

/// Body of `GET /v1/schedule`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub today: Vec<Card>,
    pub this_week: Vec<Card>,
    pub future: Vec<Card>,
}

impl From<Buckets<'_, Card>> for ScheduleResponse {
    fn from(buckets: Buckets<'_, Card>) -> Self {
        let owned = |cards: Vec<&Card>| -> Vec<Card> { cards.into_iter().cloned().collect() };
        Self {
            today: owned(buckets.today),
            this_week: owned(buckets.this_week),
            future: owned(buckets.future),
        }
    }
}

/// Cards to study in today's session, overdue ones included
#[derive(Debug, Serialize)]
pub struct TodaySession {
    pub date: NaiveDate,
    pub total: usize,
    pub cards: Vec<Card>,
}

/// Query of `GET /v1/calendar`; missing fields default to the current month
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    pub due_today: usize,
    pub due_within_week: usize,
}
