//! Data models for decks and flashcards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Difficulty assigned when a card was generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// User answer quality for a review, ordered from worst to best.
///
/// The numeric values 0-3 are part of the external contract: the UI binds
/// them to the keyboard shortcuts 1-4 on the review buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rating {
    /// Complete blackout; the card comes back within the session
    Again = 0,
    /// Recalled with serious difficulty
    Hard = 1,
    /// Recalled correctly
    Good = 2,
    /// Recalled instantly
    Easy = 3,
}

impl Rating {
    /// Map a numeric rating (0-3) coming from the UI
    pub fn from_index(index: i32) -> Rating {
        match index {
            0 => Rating::Again,
            1 => Rating::Hard,
            3 => Rating::Easy,
            _ => Rating::Good, // Default to Good
        }
    }

    pub fn as_index(self) -> i32 {
        self as i32
    }
}

/// Spaced repetition state for a card
///
/// A card without `SrsData` has never been reviewed and is due immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsData {
    /// Current interval in days (0 = due within the same session)
    #[serde(default)]
    pub interval: i32,
    /// Consecutive successful reviews; resets to 0 on Again
    #[serde(default)]
    pub repetitions: i32,
    /// SM-2 ease factor (default 2.5, floor 1.3)
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f32,
    /// When the card is next due for review
    pub next_review: DateTime<Utc>,
}

fn default_ease_factor() -> f32 {
    2.5
}

impl SrsData {
    pub fn new(next_review: DateTime<Utc>) -> Self {
        Self {
            interval: 0,
            repetitions: 0,
            ease_factor: default_ease_factor(),
            next_review,
        }
    }
}

/// A flashcard with question (front) and answer (back)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srs_data: Option<SrsData>,
    /// Knowledge graph connections to cards in any deck
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_card_ids: Vec<Uuid>,
}

impl Flashcard {
    pub fn new(question: String, answer: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            question,
            answer,
            difficulty: None,
            srs_data: None,
            related_card_ids: Vec::new(),
        }
    }

    /// Check if the card is due for review
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match &self.srs_data {
            Some(srs) => srs.next_review <= now,
            None => true,
        }
    }
}

/// A deck of flashcards generated from one document or topic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub topic: String,
    /// Course or subject name (e.g. "Math 101")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(topic: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic,
            subject: None,
            cards: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn card(&self, card_id: Uuid) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: Uuid) -> Option<&mut Flashcard> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }
}

/// Review statistics across a deck collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    /// Cards never reviewed
    pub new_cards: usize,
    /// Cards due now (including new cards)
    pub due_cards: usize,
}
