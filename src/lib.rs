//! FlashAI study core
//!
//! The in-process logic behind the FlashAI study tools:
//! - Deck and flashcard models with spaced repetition metadata
//! - Modified SM-2 review scheduling
//! - JSON-file deck storage
//! - Force-directed knowledge graph layout, picking and rendering
//!
//! The surrounding application (authentication, uploads, card generation)
//! supplies decks and persists review results; everything here is
//! synchronous, single-threaded and free of network I/O.

pub mod flashcards;
pub mod graph;

pub use flashcards::{Deck, Flashcard, Rating, SrsData};
pub use graph::GraphLayoutEngine;
