//! Due-date classification and study statistics.
//!
//! Every function takes the reference instant `now` explicitly. Calendar days
//! ("today", "yesterday", a calendar cell) are computed in `now`'s timezone, so
//! passing a `DateTime<Local>` or a `DateTime<FixedOffset>` gives the user's
//! local calendar while instant comparisons stay timezone independent.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Offset, TimeZone, Utc};
use serde::Serialize;

use crate::scheduler::CardStatus;

/// Length of the "this week" horizon and of the weekly-progress window.
fn week() -> Duration {
    Duration::days(7)
}

/// Anything the classifier can place on a review calendar.
pub trait Reviewable {
    /// When the item is next due
    fn next_review(&self) -> DateTime<Utc>;
    /// How many times the item has been graded
    fn review_count(&self) -> u32;
    /// The item's learning stage
    fn status(&self) -> CardStatus;
}

impl<T: Reviewable + ?Sized> Reviewable for &T {
    fn next_review(&self) -> DateTime<Utc> {
        (**self).next_review()
    }

    fn review_count(&self) -> u32 {
        (**self).review_count()
    }

    fn status(&self) -> CardStatus {
        (**self).status()
    }
}

/// Calendar date of `instant` in `tz`, or its UTC date when the local one is out of range.
fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    let utc = instant.naive_utc();
    let offset = tz.offset_from_utc_datetime(&utc).fix();
    utc.checked_add_offset(offset)
        .map_or_else(|| utc.date(), |local| local.date())
}

/// Whether `next_review` is strictly before the start of today.
pub fn is_overdue<Tz: TimeZone>(next_review: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    local_date(next_review, &now.timezone()) < now.date_naive()
}

/// Whether `next_review` is today or earlier; overdue items count as due today.
pub fn is_due_today<Tz: TimeZone>(next_review: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    local_date(next_review, &now.timezone()) <= now.date_naive()
}

/// Whether `next_review` is strictly after `now` and no later than a week from `now`.
///
/// An item due later today is both due today and due this week.
pub fn is_due_this_week<Tz: TimeZone>(next_review: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    let now = now.with_timezone(&Utc);
    next_review > now && next_review <= now + week()
}

/// Whether `next_review` is more than a week after `now`.
pub fn is_future<Tz: TimeZone>(next_review: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    next_review > now.with_timezone(&Utc) + week()
}

/// Whether `next_review` falls on `date` in the timezone `tz`.
pub fn is_on_date<Tz: TimeZone>(next_review: DateTime<Utc>, date: NaiveDate, tz: &Tz) -> bool {
    local_date(next_review, tz) == date
}

/// A card collection split by when each card is next due.
///
/// Each bucket keeps the collection's order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buckets<'a, T> {
    /// Due today, overdue included
    pub today: Vec<&'a T>,
    /// Due after now and within seven days
    pub this_week: Vec<&'a T>,
    /// Due more than seven days from now
    pub future: Vec<&'a T>,
}

/// Partition `items` into today / this-week / future buckets.
pub fn classify<'a, T, Tz>(items: &'a [T], now: &DateTime<Tz>) -> Buckets<'a, T>
where
    T: Reviewable,
    Tz: TimeZone,
{
    let mut buckets = Buckets {
        today: Vec::new(),
        this_week: Vec::new(),
        future: Vec::new(),
    };

    for item in items {
        let next_review = item.next_review();
        if is_due_today(next_review, now) {
            buckets.today.push(item);
        }
        if is_due_this_week(next_review, now) {
            buckets.this_week.push(item);
        }
        if is_future(next_review, now) {
            buckets.future.push(item);
        }
    }

    buckets
}

/// Number of items due before the start of today.
pub fn overdue_count<T: Reviewable, Tz: TimeZone>(items: &[T], now: &DateTime<Tz>) -> usize {
    items
        .iter()
        .filter(|item| is_overdue(item.next_review(), now))
        .count()
}

/// Number of items whose next review lies within `[now - 7 days, now]`.
pub fn weekly_progress<T: Reviewable, Tz: TimeZone>(items: &[T], now: &DateTime<Tz>) -> usize {
    let now = now.with_timezone(&Utc);
    let week_ago = now - week();
    items
        .iter()
        .filter(|item| {
            let next_review = item.next_review();
            next_review >= week_ago && next_review <= now
        })
        .count()
}

/// Number of items due no later than a week from `now`, overdue included.
pub fn due_within_week<T: Reviewable, Tz: TimeZone>(items: &[T], now: &DateTime<Tz>) -> usize {
    let horizon = now.with_timezone(&Utc) + week();
    items
        .iter()
        .filter(|item| item.next_review() <= horizon)
        .count()
}

/// Consecutive calendar days, counting back from today, on which at least one
/// reviewed item is scheduled.
pub fn streak<T: Reviewable, Tz: TimeZone>(items: &[T], now: &DateTime<Tz>) -> u32 {
    let tz = now.timezone();
    let active_days: HashSet<NaiveDate> = items
        .iter()
        .filter(|item| item.review_count() > 0)
        .map(|item| local_date(item.next_review(), &tz))
        .collect();

    let mut streak = 0;
    let mut day = Some(now.date_naive());
    while let Some(current) = day {
        if !active_days.contains(&current) {
            break;
        }
        streak += 1;
        day = current.pred_opt();
    }

    streak
}

/// Percentage of mastered items, rounded; 0 for an empty collection.
pub fn mastery_rate<T: Reviewable>(items: &[T]) -> u32 {
    if items.is_empty() {
        return 0;
    }

    let mastered = items
        .iter()
        .filter(|item| item.status() == CardStatus::Mastered)
        .count();

    ((mastered as f64 / items.len() as f64) * 100.0).round() as u32
}

/// Items scheduled on `date` in `now`'s timezone.
pub fn on_date<'a, T, Tz>(items: &'a [T], date: NaiveDate, now: &DateTime<Tz>) -> Vec<&'a T>
where
    T: Reviewable,
    Tz: TimeZone,
{
    let tz = now.timezone();
    items
        .iter()
        .filter(|item| is_on_date(item.next_review(), date, &tz))
        .collect()
}

/// Aggregate figures for the study dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Cards due today, overdue included
    pub due_today: usize,
    /// Cards due before the start of today
    pub overdue: usize,
    /// Cards scheduled within the past seven days
    pub weekly_progress: usize,
    /// Consecutive days with a reviewed card scheduled
    pub streak: u32,
    /// Cards with mastered status
    pub mastered_count: usize,
    /// Size of the collection
    pub total_cards: usize,
    /// `mastered_count` as a rounded percentage of `total_cards`
    pub mastery_rate: u32,
}

/// Compute every dashboard figure for `items`.
pub fn review_stats<T: Reviewable, Tz: TimeZone>(items: &[T], now: &DateTime<Tz>) -> ReviewStats {
    ReviewStats {
        due_today: items
            .iter()
            .filter(|item| is_due_today(item.next_review(), now))
            .count(),
        overdue: overdue_count(items, now),
        weekly_progress: weekly_progress(items, now),
        streak: streak(items, now),
        mastered_count: items
            .iter()
            .filter(|item| item.status() == CardStatus::Mastered)
            .count(),
        total_cards: items.len(),
        mastery_rate: mastery_rate(items),
    }
}

/// One cell of a month calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    /// The calendar date
    pub date: NaiveDate,
    /// Cards whose next review falls on this date
    pub card_count: usize,
    /// Whether the date belongs to the requested month
    pub in_month: bool,
    /// Whether the date is today
    pub is_today: bool,
}

/// Build the Sunday-to-Saturday grid covering `month` of `year`.
///
/// Returns `None` when `year`/`month` do not name a valid month.
pub fn month_calendar<T, Tz>(
    items: &[T],
    year: i32,
    month: u32,
    now: &DateTime<Tz>,
) -> Option<Vec<CalendarDay>>
where
    T: Reviewable,
    Tz: TimeZone,
{
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_month.pred_opt()?;

    let start = first.checked_sub_signed(Duration::days(i64::from(
        first.weekday().num_days_from_sunday(),
    )))?;
    let end = last.checked_add_signed(Duration::days(i64::from(
        6 - last.weekday().num_days_from_sunday(),
    )))?;

    let tz = now.timezone();
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for item in items {
        *counts
            .entry(local_date(item.next_review(), &tz))
            .or_default() += 1;
    }

    let today = now.date_naive();
    let days = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| CalendarDay {
            date,
            card_count: counts.get(&date).copied().unwrap_or(0),
            in_month: date.month() == month && date.year() == year,
            is_today: date == today,
        })
        .collect();

    Some(days)
}
