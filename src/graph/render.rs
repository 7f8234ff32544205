//! Frame descriptions for the knowledge graph canvas
//!
//! The engine never touches a drawing surface. Each frame it emits a plain
//! list of edge, node and label draw commands in world coordinates plus the
//! camera; the host applies the camera transform and replays the commands.
//! Stroke widths are pre-divided by the zoom factor so they stay constant
//! on screen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::engine::GraphLayoutEngine;
use super::models::{Camera, NodeKind};

/// Zoom level above which every label becomes legible
const LABEL_ZOOM_THRESHOLD: f32 = 1.2;

/// Labels longer than this are truncated unless hovered
const LABEL_MAX_CHARS: usize = 25;

const EDGE_COLOR: &str = "#cbd5e1";
const EDGE_COLOR_DIMMED: &str = "#e2e8f0";
const NODE_COLOR_DIMMED: &str = "#94a3b8";
const NODE_BORDER_COLOR: &str = "#ffffff";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDraw {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub color: String,
    pub width: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDraw {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: String,
    pub border_color: String,
    pub border_width: f32,
    pub opacity: f32,
    /// Hovered node gets a glow in its own color
    pub glow: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDraw {
    pub node_id: Uuid,
    pub text: String,
    /// Anchor point, centered horizontally above the node
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub bold: bool,
}

/// One render frame: replay edges, then nodes, then labels, under `camera`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub camera: Camera,
    pub edges: Vec<EdgeDraw>,
    pub nodes: Vec<NodeDraw>,
    pub labels: Vec<LabelDraw>,
}

/// Describe the current engine state as draw commands.
///
/// Pure function of the engine state: hovering dims everything outside the
/// hovered node's neighborhood and highlights its incident edges; labels
/// show for topics, for the hovered neighborhood, and for everything once
/// zoomed past the legibility threshold.
pub fn render_frame(engine: &GraphLayoutEngine) -> Frame {
    let camera = engine.camera();
    let hovered = engine.hovered();
    let highlight = engine.highlight_set();

    let mut edges = Vec::with_capacity(engine.edges().len());
    for edge in engine.edges() {
        let (u, v) = match (engine.node(edge.source), engine.node(edge.target)) {
            (Some(u), Some(v)) => (u, v),
            _ => continue,
        };

        let has_topic = u.kind == NodeKind::Topic || v.kind == NodeKind::Topic;
        let draw = match hovered {
            Some(id) if edge.touches(id) => EdgeDraw {
                from: (u.x, u.y),
                to: (v.x, v.y),
                color: u.color.clone(),
                width: (if has_topic { 3.0 } else { 2.0 }) / camera.k,
                opacity: 1.0,
            },
            Some(_) => EdgeDraw {
                from: (u.x, u.y),
                to: (v.x, v.y),
                color: EDGE_COLOR_DIMMED.to_string(),
                width: 1.0 / camera.k,
                opacity: 0.1,
            },
            None => EdgeDraw {
                from: (u.x, u.y),
                to: (v.x, v.y),
                color: EDGE_COLOR.to_string(),
                width: 1.5 / camera.k,
                opacity: 0.4,
            },
        };
        edges.push(draw);
    }

    let mut nodes = Vec::with_capacity(engine.nodes().len());
    let mut labels = Vec::new();

    for node in engine.nodes() {
        let is_hovered = Some(node.id) == hovered;
        let is_neighbor = highlight.contains(&node.id);
        let is_dimmed = hovered.is_some() && !is_neighbor;

        nodes.push(NodeDraw {
            id: node.id,
            x: node.x,
            y: node.y,
            radius: node.radius,
            color: if is_dimmed {
                NODE_COLOR_DIMMED.to_string()
            } else {
                node.color.clone()
            },
            border_color: NODE_BORDER_COLOR.to_string(),
            border_width: (if node.kind == NodeKind::Topic { 3.0 } else { 2.0 }) / camera.k,
            opacity: if is_dimmed { 0.2 } else { 1.0 },
            glow: is_hovered,
        });

        let show_label =
            is_neighbor || node.kind == NodeKind::Topic || camera.k > LABEL_ZOOM_THRESHOLD;
        if show_label && !is_dimmed {
            let font_size = match node.kind {
                NodeKind::Topic => 16.0,
                NodeKind::Card if is_hovered => 14.0,
                NodeKind::Card => 10.0,
            };
            let text = if node.label.chars().count() > LABEL_MAX_CHARS && !is_hovered {
                let truncated: String = node.label.chars().take(LABEL_MAX_CHARS - 2).collect();
                format!("{}..", truncated)
            } else {
                node.label.clone()
            };

            labels.push(LabelDraw {
                node_id: node.id,
                text,
                x: node.x,
                y: node.y - node.radius - 8.0,
                font_size,
                bold: node.kind == NodeKind::Topic,
            });
        }
    }

    Frame {
        camera,
        edges,
        nodes,
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::{Deck, Flashcard};

    fn sample_engine() -> (GraphLayoutEngine, Deck) {
        let mut deck = Deck::new("Chemistry".to_string());
        deck.cards.push(Flashcard::new(
            "What is a covalent bond, and how does electron sharing work?".to_string(),
            "A bond formed by shared electron pairs".to_string(),
        ));
        deck.cards
            .push(Flashcard::new("Define molarity".to_string(), "mol/L".to_string()));

        let mut engine = GraphLayoutEngine::new(800.0, 600.0);
        engine.build(&[deck.clone()]);
        (engine, deck)
    }

    #[test]
    fn frame_covers_all_nodes_and_edges() {
        let (engine, _deck) = sample_engine();
        let frame = render_frame(&engine);

        assert_eq!(frame.nodes.len(), engine.nodes().len());
        assert_eq!(frame.edges.len(), engine.edges().len());
        assert_eq!(frame.camera, engine.camera());
    }

    #[test]
    fn only_topic_labels_at_default_zoom() {
        let (engine, deck) = sample_engine();
        let frame = render_frame(&engine);

        assert_eq!(frame.labels.len(), 1);
        assert_eq!(frame.labels[0].node_id, deck.id);
        assert!(frame.labels[0].bold);
    }

    #[test]
    fn zooming_in_reveals_card_labels() {
        let (mut engine, _deck) = sample_engine();
        // Zoom well past the legibility threshold
        engine.on_wheel(-2000.0, 400.0, 300.0);
        let frame = render_frame(&engine);

        assert_eq!(frame.labels.len(), engine.nodes().len());
    }

    #[test]
    fn long_labels_truncate_unless_hovered() {
        let (mut engine, deck) = sample_engine();
        engine.on_wheel(-2000.0, 400.0, 300.0);
        let long_card = deck.cards[0].id;

        let frame = render_frame(&engine);
        let label = frame
            .labels
            .iter()
            .find(|l| l.node_id == long_card)
            .unwrap();
        assert!(label.text.ends_with(".."));
        assert_eq!(label.text.chars().count(), 25);

        engine.on_hover(Some(long_card));
        let frame = render_frame(&engine);
        let label = frame
            .labels
            .iter()
            .find(|l| l.node_id == long_card)
            .unwrap();
        assert!(!label.text.ends_with(".."));
    }

    #[test]
    fn hover_dims_outside_neighborhood() {
        let mut deck_a = Deck::new("A".to_string());
        deck_a
            .cards
            .push(Flashcard::new("q1".to_string(), "a1".to_string()));
        let mut deck_b = Deck::new("B".to_string());
        deck_b
            .cards
            .push(Flashcard::new("q2".to_string(), "a2".to_string()));

        let mut engine = GraphLayoutEngine::new(800.0, 600.0);
        engine.build(&[deck_a.clone(), deck_b.clone()]);
        engine.on_hover(Some(deck_a.id));

        let frame = render_frame(&engine);
        let hovered = frame.nodes.iter().find(|n| n.id == deck_a.id).unwrap();
        assert!(hovered.glow);
        assert_eq!(hovered.opacity, 1.0);

        let other_topic = frame.nodes.iter().find(|n| n.id == deck_b.id).unwrap();
        assert!(!other_topic.glow);
        assert_eq!(other_topic.opacity, 0.2);

        // Deck A's cluster edge is highlighted, deck B's is dimmed
        let bright = frame.edges.iter().filter(|e| e.opacity == 1.0).count();
        let dimmed = frame.edges.iter().filter(|e| e.opacity == 0.1).count();
        assert_eq!(bright, 1);
        assert_eq!(dimmed, 1);
    }
}
