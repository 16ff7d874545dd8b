//! Interval and ease-factor updates applied when a card is graded.

use std::fmt;

use chrono::{DateTime, Days, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Interval, in days, given to a card that has never been graded.
pub const DEFAULT_INTERVAL: u32 = 1;

/// Ease factor given to a card that has never been graded.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Floor applied to every ease factor the scheduler produces.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Interval and multipliers per grade, in days.
const AGAIN_INTERVAL: u32 = 1;
const HARD_MULTIPLIER: f64 = 2.0;
const FALLBACK_INTERVAL: u32 = 4;
const EASY_MULTIPLIER: f64 = 7.0;

const AGAIN_EASE_PENALTY: f64 = 0.2;
const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.15;

/// The user's self-reported recall for a card.
///
/// Grades are matched exactly, so `"GOOD"` or `" good"` parse to
/// [`Outcome::Unrecognized`] like any other unknown string. The scheduler
/// still accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    /// Forgot the solution entirely
    Again,
    /// Recalled with significant effort
    Hard,
    /// Recalled correctly
    Good,
    /// Recalled instantly
    Easy,
    /// Anything else a client sent
    Unrecognized,
}

impl Outcome {
    /// The lowercase wire name of this outcome
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl From<&str> for Outcome {
    fn from(value: &str) -> Self {
        match value {
            "again" => Self::Again,
            "hard" => Self::Hard,
            "good" => Self::Good,
            "easy" => Self::Easy,
            _ => Self::Unrecognized,
        }
    }
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.as_str().to_string()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learning stage of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// Never graded
    #[default]
    New,
    /// Last graded "again"
    Learning,
    /// Graded at least once and not mastered
    Review,
    /// Graded "easy" after at least two earlier reviews
    Mastered,
}

impl CardStatus {
    /// The lowercase wire name of this status
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Mastered => "mastered",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scheduling a graded card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    /// Days until the next review, always at least 1
    pub next_interval: u32,
    /// When the card is next due
    pub next_review_date: DateTime<Utc>,
    /// Updated ease factor, never below [`MIN_EASE_FACTOR`]
    pub ease_factor: f64,
}

/// Compute the next review schedule for a graded card.
///
/// # Arguments
///
/// * `outcome` - How well the card was recalled
/// * `current_interval` - The card's current interval in days (defaults to 1)
/// * `current_ease_factor` - The card's current ease factor (defaults to 2.5)
/// * `now` - The grading instant; its timezone decides what "n days later" means
///
/// # Algorithm
///
/// * Again: interval 1, ease − 0.2
/// * Hard: ease − 0.15, interval `interval × 2 × (new ease − 0.15)`
/// * Good: ease unchanged, interval `interval × ease`
/// * Easy: ease + 0.15, interval `interval × new ease × 7`
/// * Unrecognized: interval 4, ease unchanged
///
/// The hard branch multiplies by the ease factor *after* its penalty has been
/// applied. Intervals are rounded half away from zero and never drop below 1
/// day; the ease factor never drops below 1.3.
///
/// The next review lands `interval` calendar days after `now` at the same
/// local wall-clock time, and never later than [`latest_review_date`].
pub fn calculate_next_review<Tz: TimeZone>(
    outcome: Outcome,
    current_interval: Option<u32>,
    current_ease_factor: Option<f64>,
    now: DateTime<Tz>,
) -> ReviewSchedule {
    let interval = f64::from(current_interval.unwrap_or(DEFAULT_INTERVAL));
    let ease = current_ease_factor.unwrap_or(DEFAULT_EASE_FACTOR);

    let (next_interval, new_ease) = match outcome {
        Outcome::Again => (AGAIN_INTERVAL, ease - AGAIN_EASE_PENALTY),
        Outcome::Hard => {
            let new_ease = (ease - HARD_EASE_PENALTY).max(MIN_EASE_FACTOR);
            let days = round_days(interval * HARD_MULTIPLIER * (new_ease - HARD_EASE_PENALTY));
            (days, new_ease)
        }
        Outcome::Good => (round_days(interval * ease), ease),
        Outcome::Easy => {
            let new_ease = ease + EASY_EASE_BONUS;
            (round_days(interval * new_ease * EASY_MULTIPLIER), new_ease)
        }
        Outcome::Unrecognized => (FALLBACK_INTERVAL, ease),
    };

    let next_interval = next_interval.max(1);

    ReviewSchedule {
        next_interval,
        next_review_date: add_days(now, next_interval),
        ease_factor: new_ease.max(MIN_EASE_FACTOR),
    }
}

/// Derive a card's status after grading.
///
/// # Arguments
///
/// * `outcome` - The grade just given
/// * `review_count_before` - The card's review count before this grading
pub const fn derive_status(outcome: Outcome, review_count_before: u32) -> CardStatus {
    match outcome {
        Outcome::Easy if review_count_before >= 2 => CardStatus::Mastered,
        Outcome::Again => CardStatus::Learning,
        // Every other grade moves the card to review, its first grading included.
        _ => CardStatus::Review,
    }
}

fn round_days(days: f64) -> u32 {
    // `as` saturates, so negative or NaN products land on 0 and get floored to 1 by the caller.
    days.round() as u32
}

/// Upper bound for any scheduled review.
///
/// Sits a day inside chrono's range so the date stays representable under
/// every UTC offset.
pub fn latest_review_date() -> DateTime<Utc> {
    DateTime::<Utc>::MAX_UTC - Duration::days(1)
}

fn add_days<Tz: TimeZone>(now: DateTime<Tz>, days: u32) -> DateTime<Utc> {
    let latest = latest_review_date();
    // Local wall time can be skipped or repeated on the target day; fall back to whole days then.
    now.clone()
        .checked_add_days(Days::new(u64::from(days)))
        .or_else(|| now.checked_add_signed(Duration::days(i64::from(days))))
        .map_or(latest, |due| due.with_timezone(&Utc).min(latest))
}
