use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lcf_srs::{
    CardStatus, DEFAULT_EASE_FACTOR, DEFAULT_INTERVAL, Outcome, ReviewSchedule, Reviewable,
    calculate_next_review, derive_status, is_on_date,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Problem difficulty as labelled by the user (not used for scheduling)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flashcard model - one interview problem with its scheduling state
///
/// Serialized with camelCase keys, the format of the stored collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Opaque card identifier (older documents may store it as a number)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Problem title
    pub title: String,
    /// Problem statement
    pub problem: String,
    /// Reference solution
    pub solution: String,
    /// Explanation of the approach
    pub explanation: String,
    /// User-assigned difficulty
    pub difficulty: Difficulty,
    /// Topic tags, in the order they were entered
    #[serde(default)]
    pub tags: Vec<String>,
    /// Learning stage
    #[serde(default)]
    pub status: CardStatus,
    /// When the card was created
    pub created_at: DateTime<Utc>,
    /// When the card is next due
    pub next_review: DateTime<Utc>,
    /// Current interval in days
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Current ease factor
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Number of times the card has been graded
    #[serde(default)]
    pub review_count: u32,
}

const fn default_interval() -> u32 {
    DEFAULT_INTERVAL
}

const fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Integer(id) => id.to_string(),
    })
}

impl Card {
    /// Create a new, never reviewed card due at `now`.
    pub fn new(id: String, new_card: NewCard, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new_card.title,
            problem: new_card.problem,
            solution: new_card.solution,
            explanation: new_card.explanation,
            difficulty: new_card.difficulty,
            tags: clean_tags(new_card.tags),
            status: CardStatus::New,
            created_at: now,
            next_review: now,
            interval: DEFAULT_INTERVAL,
            ease_factor: DEFAULT_EASE_FACTOR,
            review_count: 0,
        }
    }

    /// Grade this card at `now`, returning the updated card and its schedule.
    ///
    /// Only the scheduling fields, the status and the review count change.
    /// The next review is counted in calendar days of `now`'s timezone.
    pub fn graded<Tz: TimeZone>(
        &self,
        outcome: Outcome,
        now: DateTime<Tz>,
    ) -> (Self, ReviewSchedule) {
        let schedule =
            calculate_next_review(outcome, Some(self.interval), Some(self.ease_factor), now);

        let card = Self {
            interval: schedule.next_interval,
            next_review: schedule.next_review_date,
            ease_factor: schedule.ease_factor,
            review_count: self.review_count.saturating_add(1),
            status: derive_status(outcome, self.review_count),
            ..self.clone()
        };

        (card, schedule)
    }
}

impl Reviewable for Card {
    fn next_review(&self) -> DateTime<Utc> {
        self.next_review
    }

    fn review_count(&self) -> u32 {
        self.review_count
    }

    fn status(&self) -> CardStatus {
        self.status
    }
}

/// Content of a card to be created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub title: String,
    pub problem: String,
    pub solution: String,
    pub explanation: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Split a comma-separated tag string.
///
/// # Examples
/// ```
/// use lcf_store::models::parse_tags;
///
/// assert_eq!(parse_tags("array, hash-table,,"), vec!["array", "hash-table"]);
/// ```
pub fn parse_tags(raw: &str) -> Vec<String> {
    clean_tags(raw.split(',').map(str::to_string))
}

/// Trim every tag and drop the empty ones, keeping their order.
pub fn clean_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Query filters for the card list
///
/// A missing criterion matches every card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    pub difficulty: Option<Difficulty>,
    pub status: Option<CardStatus>,
    /// Calendar day the card must be due on
    pub date: Option<NaiveDate>,
}

impl CardFilter {
    /// Whether no criterion is set
    pub const fn is_empty(&self) -> bool {
        self.difficulty.is_none() && self.status.is_none() && self.date.is_none()
    }

    /// Whether `card` satisfies every criterion; `date` is read in `tz`.
    pub fn matches<Tz: TimeZone>(&self, card: &Card, tz: &Tz) -> bool {
        if self.difficulty.is_some_and(|difficulty| card.difficulty != difficulty) {
            return false;
        }
        if self.status.is_some_and(|status| card.status != status) {
            return false;
        }
        if let Some(date) = self.date {
            if !is_on_date(card.next_review, date, tz) {
                return false;
            }
        }
        true
    }
}
