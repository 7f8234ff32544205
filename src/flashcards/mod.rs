//! Flashcard decks and spaced repetition
//!
//! This module provides:
//! - Deck and card data models (matching the backend's JSON shape)
//! - Modified SM-2 spaced repetition algorithm
//! - Review state tracking and JSON-file deck storage

pub mod algorithm;
pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{DeckStorage, DeckStorageError};
