use lcf_srs::{Outcome, ReviewSchedule};
use lcf_store::{Card, Difficulty, NewCard, models::clean_tags, models::parse_tags};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tags as sent by a client: a list, or one comma-separated string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for TagsInput {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl TagsInput {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            Self::List(tags) => clean_tags(tags),
            Self::Csv(raw) => parse_tags(&raw),
        }
    }
}

/// Body of `POST /v1/cards`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required (at most 200 characters)"))]
    pub title: String,
    #[validate(length(min = 1, max = 20000, message = "Problem is required (at most 20000 characters)"))]
    pub problem: String,
    #[validate(length(min = 1, max = 20000, message = "Solution is required (at most 20000 characters)"))]
    pub solution: String,
    #[validate(length(min = 1, max = 20000, message = "Explanation is required (at most 20000 characters)"))]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: TagsInput,
}

impl CreateCardRequest {
    /// Copy with surrounding whitespace removed from every text field
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            problem: self.problem.trim().to_string(),
            solution: self.solution.trim().to_string(),
            explanation: self.explanation.trim().to_string(),
            ..self
        }
    }

    pub fn into_new_card(self) -> NewCard {
        NewCard {
            title: self.title,
            problem: self.problem,
            solution: self.solution,
            explanation: self.explanation,
            difficulty: self.difficulty,
            tags: self.tags.into_tags(),
        }
    }
}

/// Query of `GET /v1/cards`
#[derive(Debug, Default, Deserialize)]
pub struct CardListQuery {
    pub difficulty: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
}

/// Body of `POST /v1/cards/{id}/review`
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub card: Card,
    pub schedule: ReviewSchedule,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateCardRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tags_from_list_or_string() {
        let from_list = request(json!({
            "title": "Two Sum",
            "problem": "p",
            "solution": "s",
            "explanation": "e",
            "tags": [" array", "", "hash-table "]
        }));
        assert_eq!(from_list.tags.into_tags(), vec!["array", "hash-table"]);

        let from_string = request(json!({
            "title": "Two Sum",
            "problem": "p",
            "solution": "s",
            "explanation": "e",
            "tags": "array, hash-table"
        }));
        assert_eq!(from_string.tags.into_tags(), vec!["array", "hash-table"]);
    }

    #[test]
    fn test_blank_fields_fail_validation() {
        let blank_title = request(json!({
            "title": "   ",
            "problem": "p",
            "solution": "s",
            "explanation": "e"
        }))
        .trimmed();

        let errors = blank_title.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_defaults() {
        let new_card = request(json!({
            "title": " Two Sum ",
            "problem": "p",
            "solution": "s",
            "explanation": "e"
        }))
        .trimmed();

        assert!(new_card.validate().is_ok());

        let new_card = new_card.into_new_card();
        assert_eq!(new_card.title, "Two Sum");
        assert_eq!(new_card.difficulty, Difficulty::Easy);
        assert!(new_card.tags.is_empty());
    }

    #[test]
    fn test_review_request_accepts_any_outcome() {
        let known: ReviewRequest = serde_json::from_value(json!({ "outcome": "good" })).unwrap();
        assert_eq!(known.outcome, Outcome::Good);

        let shouted: ReviewRequest = serde_json::from_value(json!({ "outcome": "Good" })).unwrap();
        assert_eq!(shouted.outcome, Outcome::Unrecognized);

        let unknown: ReviewRequest = serde_json::from_value(json!({ "outcome": "meh" })).unwrap();
        assert_eq!(unknown.outcome, Outcome::Unrecognized);
    }
}
