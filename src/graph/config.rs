//! Tuning constants for the layout simulation
//!
//! The defaults produce one visually distinct cluster per deck with
//! cross-deck semantic links pulling related cards closer. They can be
//! retuned freely as long as that qualitative behavior holds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Inverse-square repulsion strength between node pairs
    pub repulsion: f32,
    /// Pairs further apart than this exert no repulsion
    pub repulsion_cutoff: f32,
    /// Multiplier on repulsion for Topic <-> Topic pairs, separating clusters
    pub topic_repulsion_boost: f32,
    /// Spring rest length for Topic <-> Card cluster edges
    pub spring_length_cluster: f32,
    /// Spring rest length for Card <-> Card semantic edges
    pub spring_length_related: f32,
    pub spring_strength: f32,
    /// Pull toward the viewport center
    pub center_gravity: f32,
    /// Velocity magnitude cap per tick
    pub max_velocity: f32,
    /// Velocity multiplier applied every tick (< 1)
    pub damping: f32,
    /// Alpha multiplier per tick (exponential cool-down)
    pub alpha_decay: f32,
    /// Below this alpha the simulation is considered settled
    pub alpha_min: f32,
    /// Fixed radius for topic nodes
    pub topic_radius: f32,
    /// Card radius = clamp(base + degree * growth, base, max)
    pub card_radius_base: f32,
    pub card_radius_growth: f32,
    pub card_radius_max: f32,
    /// Extra pick radius around a node for hit-testing
    pub hit_slack: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 500.0,
            repulsion_cutoff: 500.0,
            topic_repulsion_boost: 3.0,
            spring_length_cluster: 80.0,
            spring_length_related: 120.0,
            spring_strength: 0.08,
            center_gravity: 0.008,
            max_velocity: 12.0,
            damping: 0.65,
            alpha_decay: 0.98,
            alpha_min: 0.001,
            topic_radius: 25.0,
            card_radius_base: 4.0,
            card_radius_growth: 1.2,
            card_radius_max: 12.0,
            hit_slack: 5.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
        }
    }
}
