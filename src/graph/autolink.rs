//! Text-similarity auto-linking between cards
//!
//! Feeds cross-card edges into the layout: cards whose question+answer
//! text share enough meaningful words (Jaccard similarity over token sets)
//! get linked automatically. Pure functions, no I/O; the caller persists
//! the resulting connection map.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::flashcards::{Deck, Flashcard};

/// Similarity above this links two cards; tuned for short flashcard text
pub const DEFAULT_THRESHOLD: f32 = 0.08;

/// Common words carrying no topical signal
const STOP_WORDS: [&str; 39] = [
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "if", "then", "else", "when",
    "of", "to", "in", "for", "with", "by", "about", "as", "into", "like", "through", "after",
    "over", "between", "out", "against", "during", "without", "before", "under", "around", "among",
    "what", "how", "why",
];

/// Tokenize text into a set of unique meaningful words: lowercased,
/// punctuation stripped, stop words and words of 3 chars or fewer dropped
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity between the token sets of two texts (0.0 - 1.0)
pub fn similarity(text_a: &str, text_b: &str) -> f32 {
    let tokens_a = tokenize(text_a);
    let tokens_b = tokenize(text_b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    intersection as f32 / union as f32
}

/// Scan all cards across all decks and link pairs sharing significant
/// concepts.
///
/// Returns the full related-id set per card: existing links are kept and
/// new symmetric links added for every pair above `threshold` (O(N²)
/// pairwise comparison over question+answer text).
pub fn generate_auto_connections(decks: &[Deck], threshold: f32) -> HashMap<Uuid, Vec<Uuid>> {
    let all_cards: Vec<&Flashcard> = decks.iter().flat_map(|d| d.cards.iter()).collect();

    let mut connections: HashMap<Uuid, Vec<Uuid>> = all_cards
        .iter()
        .map(|c| (c.id, c.related_card_ids.clone()))
        .collect();

    for i in 0..all_cards.len() {
        for j in (i + 1)..all_cards.len() {
            let card_a = all_cards[i];
            let card_b = all_cards[j];

            // Combine question and answer for context
            let content_a = format!("{} {}", card_a.question, card_a.answer);
            let content_b = format!("{} {}", card_b.question, card_b.answer);

            if similarity(&content_a, &content_b) > threshold {
                let links_a = connections.entry(card_a.id).or_default();
                if !links_a.contains(&card_b.id) {
                    links_a.push(card_b.id);
                }
                let links_b = connections.entry(card_b.id).or_default();
                if !links_b.contains(&card_a.id) {
                    links_b.push(card_a.id);
                }
            }
        }
    }

    connections
}

/// Manually link two cards in both directions (no-op if already linked)
pub fn link_cards(card_a: &mut Flashcard, card_b: &mut Flashcard) {
    if !card_a.related_card_ids.contains(&card_b.id) {
        card_a.related_card_ids.push(card_b.id);
    }
    if !card_b.related_card_ids.contains(&card_a.id) {
        card_b.related_card_ids.push(card_a.id);
    }
}
