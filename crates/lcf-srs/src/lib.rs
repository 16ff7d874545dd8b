//! SRS (Spaced Repetition System) library for LeetCode Flashcards
//!
//! This crate provides the review scheduler that updates a card's interval and
//! ease factor after each grading, and the classifier that sorts a card
//! collection into due-date buckets and computes the study statistics shown
//! alongside them.
//!
//! Everything here is pure: the reference instant is always passed in by the
//! caller, never read from the system clock.

pub mod classifier;
pub mod scheduler;

pub use classifier::{
    Buckets, CalendarDay, ReviewStats, Reviewable, classify, due_within_week, is_due_this_week,
    is_due_today, is_future, is_on_date, is_overdue, mastery_rate, month_calendar, on_date,
    overdue_count, review_stats, streak, weekly_progress,
};
pub use scheduler::{
    CardStatus, DEFAULT_EASE_FACTOR, DEFAULT_INTERVAL, MIN_EASE_FACTOR, Outcome, ReviewSchedule,
    calculate_next_review, derive_status, latest_review_date,
};
