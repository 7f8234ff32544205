//! Simulation types for the knowledge graph

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of node in the knowledge graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// Deck-level cluster center
    Topic,
    /// Individual flashcard
    Card,
}

/// A node in the layout simulation.
///
/// Topic nodes carry their deck's id, card nodes their card's id. Position
/// and velocity are in world coordinates and mutate every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: Uuid,
    pub kind: NodeKind,
    pub label: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
    pub radius: f32,
    /// CSS color inherited from the parent deck
    pub color: String,
    /// Count of incident edges; drives card node radius
    pub degree: usize,
}

/// Kind of edge, determining the spring rest length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// Topic <-> Card cluster membership (tighter)
    Cluster,
    /// Card <-> Card semantic link (looser)
    Related,
}

/// An undirected edge between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: Uuid,
    pub target: Uuid,
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn touches(&self, id: Uuid) -> bool {
        self.source == id || self.target == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint
    pub fn other(&self, id: Uuid) -> Option<Uuid> {
        if self.source == id {
            Some(self.target)
        } else if self.target == id {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Pan offset and zoom scale for screen <-> world transforms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub k: f32,
}

impl Default for Camera {
    /// Home view: no pan, zoomed out slightly to show whole clusters
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, k: 0.6 }
    }
}
