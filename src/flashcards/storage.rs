//! Storage operations for decks
//!
//! On-disk layout:
//! ```text
//! {data-dir}/decks/
//! └── {deck-id}.json    # Deck with its cards and their SRS state
//! ```
//!
//! Each deck file owns its cards wholesale, matching the backend's row
//! shape, so a review writes back the full deck it belongs to.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::debug;
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::compute_next_review;
use super::models::*;

#[derive(Error, Debug)]
pub enum DeckStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, DeckStorageError>;

/// Storage manager for deck operations
pub struct DeckStorage {
    /// Base path for app data (e.g., ~/.local/share/flashai)
    data_dir: PathBuf,
}

impl DeckStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Default data directory under the platform's local data dir
    pub fn default_data_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("flashai"))
    }

    fn decks_dir(&self) -> PathBuf {
        self.data_dir.join("decks")
    }

    fn deck_path(&self, deck_id: Uuid) -> PathBuf {
        self.decks_dir().join(format!("{}.json", deck_id))
    }

    /// Initialize the storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.decks_dir())?;
        Ok(())
    }

    // ==================== Deck Operations ====================

    /// List all decks, newest first
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let decks_dir = self.decks_dir();
        if !decks_dir.exists() {
            return Ok(Vec::new());
        }

        let mut decks = Vec::new();
        for entry in fs::read_dir(&decks_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let deck: Deck = serde_json::from_str(&content)?;
                decks.push(deck);
            }
        }

        decks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(decks)
    }

    /// Get a specific deck
    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        let deck_path = self.deck_path(deck_id);
        if !deck_path.exists() {
            return Err(DeckStorageError::DeckNotFound(deck_id));
        }

        let content = fs::read_to_string(&deck_path)?;
        let deck: Deck = serde_json::from_str(&content)?;
        Ok(deck)
    }

    /// Create or replace a deck
    pub fn save_deck(&self, deck: &Deck) -> Result<()> {
        self.init()?;

        let deck_path = self.deck_path(deck.id);
        fs::write(&deck_path, serde_json::to_string_pretty(deck)?)?;

        debug!("saved deck {} ({} cards)", deck.id, deck.cards.len());
        Ok(())
    }

    /// Delete a deck and all its cards
    pub fn delete_deck(&self, deck_id: Uuid) -> Result<()> {
        let deck_path = self.deck_path(deck_id);
        if !deck_path.exists() {
            return Err(DeckStorageError::DeckNotFound(deck_id));
        }

        fs::remove_file(&deck_path)?;
        Ok(())
    }

    // ==================== Review Operations ====================

    /// Get all due cards (optionally filtered by deck), never-reviewed first
    pub fn due_cards(&self, deck_id: Option<Uuid>, now: DateTime<Utc>) -> Result<Vec<Flashcard>> {
        let decks = match deck_id {
            Some(id) => vec![self.get_deck(id)?],
            None => self.list_decks()?,
        };

        let mut due: Vec<Flashcard> = decks
            .into_iter()
            .flat_map(|d| d.cards)
            .filter(|c| c.is_due(now))
            .collect();

        // New cards (no SRS data) come first, then oldest due date
        due.sort_by_key(|c| c.srs_data.as_ref().map(|s| s.next_review));
        Ok(due)
    }

    /// Submit a review for a card: run the scheduler and persist the result
    pub fn submit_review(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<SrsData> {
        let mut deck = self.get_deck(deck_id)?;
        let card = deck
            .card_mut(card_id)
            .ok_or(DeckStorageError::CardNotFound(card_id))?;

        let next = compute_next_review(card.srs_data.as_ref(), rating, now);
        card.srs_data = Some(next.clone());

        self.save_deck(&deck)?;
        Ok(next)
    }

    /// Write auto-link results back onto cards across all decks.
    ///
    /// `connections` maps card id to its full related-card set; cards not
    /// present in the map keep their existing links.
    pub fn apply_connections(&self, connections: &HashMap<Uuid, Vec<Uuid>>) -> Result<()> {
        for mut deck in self.list_decks()? {
            let mut changed = false;
            for card in &mut deck.cards {
                if let Some(related) = connections.get(&card.id) {
                    if &card.related_card_ids != related {
                        card.related_card_ids = related.clone();
                        changed = true;
                    }
                }
            }
            if changed {
                self.save_deck(&deck)?;
            }
        }
        Ok(())
    }

    /// Review statistics across all decks
    pub fn stats(&self, now: DateTime<Utc>) -> Result<ReviewStats> {
        let mut stats = ReviewStats::default();

        for deck in self.list_decks()? {
            for card in &deck.cards {
                stats.total_cards += 1;
                if card.srs_data.is_none() {
                    stats.new_cards += 1;
                }
                if card.is_due(now) {
                    stats.due_cards += 1;
                }
            }
        }

        Ok(stats)
    }
}
