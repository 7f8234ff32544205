//! Modified SuperMemo-2 spaced repetition algorithm
//!
//! Computes the next review interval from a card's prior state and a
//! 4-value rating (Again/Hard/Good/Easy), in the style of Anki's SM-2
//! variant rather than the textbook 0-5 quality scale:
//! - Again resets repetitions and makes the card due within the session
//! - Easy/Hard adjust the ease factor by +/-0.15 (floor 1.3)
//! - Intervals progress 1 day, 6 days, then interval * ease
//! - Hard additionally halves the computed interval (minimum 1 day)

use chrono::{DateTime, Duration, Utc};

use super::models::{Rating, SrsData};

/// Minimum ease factor allowed
const MIN_EASE_FACTOR: f32 = 1.3;

/// Intervals are whole days; next_review is exactly interval days out
const DAY_MS: i64 = 86_400_000;

/// Calculate the next review state for a card.
///
/// Pure function: `now` is the review timestamp and the only clock input,
/// `current` is the prior state (`None` for a never-reviewed card). The
/// caller persists the returned state onto the card.
pub fn compute_next_review(
    current: Option<&SrsData>,
    rating: Rating,
    now: DateTime<Utc>,
) -> SrsData {
    let mut interval = current.map_or(0, |s| s.interval);
    let mut repetitions = current.map_or(0, |s| s.repetitions);
    let mut ease_factor = current.map_or(2.5, |s| s.ease_factor);

    if rating == Rating::Again {
        // Reset repetitions, card is due again this session
        repetitions = 0;
        interval = 0;
    } else {
        // Successful recall (Hard, Good, Easy)
        match rating {
            Rating::Easy => ease_factor += 0.15,
            Rating::Hard => ease_factor -= 0.15,
            _ => {}
        }
        ease_factor = ease_factor.max(MIN_EASE_FACTOR);

        repetitions += 1;
        interval = match repetitions {
            1 => 1,
            2 => 6,
            _ => (interval as f32 * ease_factor).round() as i32,
        };

        // Hard still grows the interval, just slower. The halving applies
        // after the regular progression, so two Hard ratings in a row do
        // not follow the textbook SM-2 trajectory (see tests).
        if rating == Rating::Hard {
            interval = ((interval as f32 * 0.5).floor() as i32).max(1);
        }
    }

    SrsData {
        interval,
        repetitions,
        ease_factor,
        next_review: now + Duration::milliseconds(interval as i64 * DAY_MS),
    }
}

/// Estimate the interval label for a review button ("< 10m", "6d", "2mo", "1y").
///
/// Runs the scheduler speculatively; nothing is mutated or persisted.
pub fn estimate_label(rating: Rating, current: Option<&SrsData>, now: DateTime<Utc>) -> String {
    let result = compute_next_review(current, rating, now);

    if result.interval == 0 {
        "< 10m".to_string()
    } else if result.interval >= 365 {
        format!("{}y", (result.interval as f32 / 365.0).round() as i32)
    } else if result.interval >= 30 {
        format!("{}mo", (result.interval as f32 / 30.0).round() as i32)
    } else {
        format!("{}d", result.interval)
    }
}
