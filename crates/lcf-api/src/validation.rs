use chrono::NaiveDate;
use lcf_srs::CardStatus;
use lcf_store::{CardFilter, Difficulty};

use crate::error::ApiError;

/// Value accepted by list filters to mean "no filter"
const ALL: &str = "all";

/// Parse a difficulty filter; empty or `all` means no filter.
///
/// # Examples
/// ```
/// use lcf_api::validation::parse_difficulty;
/// use lcf_store::Difficulty;
///
/// assert_eq!(parse_difficulty("Medium").unwrap(), Some(Difficulty::Medium));
/// assert_eq!(parse_difficulty("all").unwrap(), None);
/// assert!(parse_difficulty("impossible").is_err());
/// ```
pub fn parse_difficulty(raw: &str) -> Result<Option<Difficulty>, ApiError> {
    match raw.trim().to_lowercase().as_str() {
        "" | ALL => Ok(None),
        "easy" => Ok(Some(Difficulty::Easy)),
        "medium" => Ok(Some(Difficulty::Medium)),
        "hard" => Ok(Some(Difficulty::Hard)),
        _ => Err(ApiError::Validation(format!(
            "Invalid difficulty: '{raw}'. Must be one of easy, medium, hard"
        ))),
    }
}

/// Parse a status filter; empty or `all` means no filter.
pub fn parse_status(raw: &str) -> Result<Option<CardStatus>, ApiError> {
    match raw.trim().to_lowercase().as_str() {
        "" | ALL => Ok(None),
        "new" => Ok(Some(CardStatus::New)),
        "learning" => Ok(Some(CardStatus::Learning)),
        "review" => Ok(Some(CardStatus::Review)),
        "mastered" => Ok(Some(CardStatus::Mastered)),
        _ => Err(ApiError::Validation(format!(
            "Invalid status: '{raw}'. Must be one of new, learning, review, mastered"
        ))),
    }
}

/// Parse a `YYYY-MM-DD` calendar date; empty means no filter.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::Validation(format!("Invalid date: '{raw}'. Expected YYYY-MM-DD")))
}

/// Build a card filter from raw query values.
pub fn parse_card_filter(
    difficulty: Option<&str>,
    status: Option<&str>,
    date: Option<&str>,
) -> Result<CardFilter, ApiError> {
    Ok(CardFilter {
        difficulty: difficulty.map(parse_difficulty).transpose()?.flatten(),
        status: status.map(parse_status).transpose()?.flatten(),
        date: date.map(parse_date).transpose()?.flatten(),
    })
}

/// Validate a calendar month number.
pub fn validate_month(month: u32) -> Result<(), ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::Validation(format!(
            "Invalid month: {month}. Must be between 1 and 12"
        )));
    }

    Ok(())
}

/// Validate a calendar year, keeping the month grid within chrono's range.
pub fn validate_year(year: i32) -> Result<(), ApiError> {
    if !(1..=9999).contains(&year) {
        return Err(ApiError::Validation(format!(
            "Invalid year: {year}. Must be between 1 and 9999"
        )));
    }

    Ok(())
}
