//! Force-directed layout engine for the knowledge graph
//!
//! Owns all mutable simulation state (nodes, edges, camera, alpha) and is
//! driven by the host's animation loop: one `tick()` per display frame
//! while the simulation is hot, pointer/wheel events forwarded in between.
//! Single-threaded and synchronous; no I/O and no error paths — malformed
//! input (e.g. a related-card id that matches no node) is skipped during
//! graph construction.

use std::collections::{HashMap, HashSet};

use log::debug;
use rand::Rng;
use uuid::Uuid;

use crate::flashcards::Deck;

use super::config::LayoutConfig;
use super::models::{Camera, EdgeKind, GraphEdge, GraphNode, NodeKind};

/// Deck colors, cycled in order (matches the app theme)
const PALETTE: [&str; 6] = [
    "#4f46e5", // Indigo
    "#0891b2", // Cyan
    "#db2777", // Pink
    "#7c3aed", // Violet
    "#ea580c", // Orange
    "#16a34a", // Green
];

const ZOOM_SENSITIVITY: f32 = 0.001;

pub struct GraphLayoutEngine {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    /// Node id -> index into `nodes`
    index: HashMap<Uuid, usize>,
    camera: Camera,
    /// Simulation heat/energy; forces scale with it and it decays per tick
    alpha: f32,
    width: f32,
    height: f32,
    hovered: Option<Uuid>,
    dragging: Option<Uuid>,
    panning: bool,
    last_pointer: (f32, f32),
    config: LayoutConfig,
}

impl GraphLayoutEngine {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_config(width, height, LayoutConfig::default())
    }

    pub fn with_config(width: f32, height: f32, config: LayoutConfig) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
            camera: Camera::default(),
            alpha: 0.0,
            width,
            height,
            hovered: None,
            dragging: None,
            panning: false,
            last_pointer: (0.0, 0.0),
            config,
        }
    }

    // ==================== Build ====================

    /// Rebuild the graph wholesale from the current deck collection.
    ///
    /// One topic node per deck, one card node per card, a cluster edge per
    /// card and a deduplicated related edge per declared card link. Resets
    /// the camera to the home view and the simulation energy to 1.
    pub fn build(&mut self, decks: &[Deck]) {
        let mut rng = rand::thread_rng();

        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
        self.hovered = None;
        self.dragging = None;
        self.panning = false;

        let cx = self.width / 2.0;
        let cy = self.height / 2.0;

        for (deck_index, deck) in decks.iter().enumerate() {
            let color = PALETTE[deck_index % PALETTE.len()];

            // Topic node, spawned near the viewport center
            let tx = cx + rng.gen_range(-200.0..200.0);
            let ty = cy + rng.gen_range(-200.0..200.0);
            self.push_node(GraphNode {
                id: deck.id,
                kind: NodeKind::Topic,
                label: if deck.topic.is_empty() {
                    "Untitled Deck".to_string()
                } else {
                    deck.topic.clone()
                },
                x: tx,
                y: ty,
                vx: 0.0,
                vy: 0.0,
                radius: self.config.topic_radius,
                color: color.to_string(),
                degree: 0,
            });

            // Card nodes spawn near their topic and link to it
            for card in &deck.cards {
                self.push_node(GraphNode {
                    id: card.id,
                    kind: NodeKind::Card,
                    label: card.question.clone(),
                    x: tx + rng.gen_range(-50.0..50.0),
                    y: ty + rng.gen_range(-50.0..50.0),
                    vx: 0.0,
                    vy: 0.0,
                    radius: self.config.card_radius_base,
                    color: color.to_string(),
                    degree: 0,
                });
                self.push_edge(deck.id, card.id, EdgeKind::Cluster);
            }
        }

        // Related-card links; unknown targets, self-links and duplicate
        // unordered pairs are skipped
        let mut seen: HashSet<(Uuid, Uuid)> = self
            .edges
            .iter()
            .map(|e| ordered_pair(e.source, e.target))
            .collect();

        for deck in decks {
            for card in &deck.cards {
                for &target in &card.related_card_ids {
                    if target == card.id || !self.index.contains_key(&target) {
                        continue;
                    }
                    if seen.insert(ordered_pair(card.id, target)) {
                        self.push_edge(card.id, target, EdgeKind::Related);
                    }
                }
            }
        }

        // Card node radius grows with connectivity; topics stay fixed
        for node in &mut self.nodes {
            if node.kind == NodeKind::Card {
                let radius = self.config.card_radius_base
                    + node.degree as f32 * self.config.card_radius_growth;
                node.radius = radius.min(self.config.card_radius_max);
            }
        }

        self.camera = Camera::default();
        self.alpha = 1.0;

        debug!(
            "graph built: {} nodes, {} edges from {} decks",
            self.nodes.len(),
            self.edges.len(),
            decks.len()
        );
    }

    fn push_node(&mut self, node: GraphNode) {
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    fn push_edge(&mut self, source: Uuid, target: Uuid, kind: EdgeKind) {
        if let Some(&i) = self.index.get(&source) {
            self.nodes[i].degree += 1;
        }
        if let Some(&i) = self.index.get(&target) {
            self.nodes[i].degree += 1;
        }
        self.edges.push(GraphEdge { source, target, kind });
    }

    // ==================== Simulation ====================

    /// Advance the simulation by one frame.
    ///
    /// Returns `false` once the layout has settled (alpha below the
    /// threshold); the host may keep calling — it stays a no-op until the
    /// simulation is reheated by a drag, resize or rebuild.
    pub fn tick(&mut self) -> bool {
        if self.alpha <= self.config.alpha_min {
            return false;
        }

        self.apply_repulsion();
        self.apply_springs();
        self.integrate();

        self.alpha *= self.config.alpha_decay;
        true
    }

    pub fn is_settled(&self) -> bool {
        self.alpha <= self.config.alpha_min
    }

    /// All-pairs inverse-square repulsion within the cutoff distance
    fn apply_repulsion(&mut self) {
        let cfg = &self.config;
        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let dx = self.nodes[j].x - self.nodes[i].x;
                let dy = self.nodes[j].y - self.nodes[i].y;
                // Coincident nodes would divide by zero; pretend distance 1
                let dist_sq = (dx * dx + dy * dy).max(1.0);
                let dist = dist_sq.sqrt();

                if dist >= cfg.repulsion_cutoff {
                    continue;
                }

                // Stronger repulsion between topics keeps clusters apart
                let mut repulsion = cfg.repulsion;
                if self.nodes[i].kind == NodeKind::Topic && self.nodes[j].kind == NodeKind::Topic {
                    repulsion *= cfg.topic_repulsion_boost;
                }

                let force = (repulsion / dist_sq) * self.alpha;
                let fx = (dx / dist) * force;
                let fy = (dy / dist) * force;

                self.nodes[i].vx -= fx;
                self.nodes[i].vy -= fy;
                self.nodes[j].vx += fx;
                self.nodes[j].vy += fy;
            }
        }
    }

    /// Spring attraction along edges toward a rest length per edge kind
    fn apply_springs(&mut self) {
        for e in 0..self.edges.len() {
            let (source, target, kind) = {
                let edge = &self.edges[e];
                (edge.source, edge.target, edge.kind)
            };
            let (ui, vi) = match (self.index.get(&source), self.index.get(&target)) {
                (Some(&u), Some(&v)) => (u, v),
                _ => continue,
            };

            let dx = self.nodes[vi].x - self.nodes[ui].x;
            let dy = self.nodes[vi].y - self.nodes[ui].y;
            let dist = (dx * dx + dy * dy).sqrt().max(1.0);

            let rest_length = match kind {
                EdgeKind::Cluster => self.config.spring_length_cluster,
                EdgeKind::Related => self.config.spring_length_related,
            };

            let displacement = dist - rest_length;
            let force = displacement * self.config.spring_strength * self.alpha;
            let fx = (dx / dist) * force;
            let fy = (dy / dist) * force;

            self.nodes[ui].vx += fx;
            self.nodes[ui].vy += fy;
            self.nodes[vi].vx -= fx;
            self.nodes[vi].vy -= fy;
        }
    }

    /// Center gravity, velocity clamp, position update and damping
    fn integrate(&mut self) {
        let cfg = &self.config;
        let cx = self.width / 2.0;
        let cy = self.height / 2.0;

        for node in &mut self.nodes {
            node.vx += (cx - node.x) * cfg.center_gravity * self.alpha;
            node.vy += (cy - node.y) * cfg.center_gravity * self.alpha;

            // A dragged node follows the pointer, not the forces
            if Some(node.id) == self.dragging {
                node.vx = 0.0;
                node.vy = 0.0;
            }

            let speed = (node.vx * node.vx + node.vy * node.vy).sqrt();
            if speed > cfg.max_velocity {
                node.vx = node.vx / speed * cfg.max_velocity;
                node.vy = node.vy / speed * cfg.max_velocity;
            }

            node.x += node.vx;
            node.y += node.vy;

            node.vx *= cfg.damping;
            node.vy *= cfg.damping;
        }
    }

    // ==================== Camera ====================

    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            (sx - self.camera.x) / self.camera.k,
            (sy - self.camera.y) / self.camera.k,
        )
    }

    pub fn world_to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        (
            wx * self.camera.k + self.camera.x,
            wy * self.camera.k + self.camera.y,
        )
    }

    /// Zoom around the pointer position, keeping the world point under the
    /// cursor fixed on screen
    pub fn on_wheel(&mut self, delta: f32, sx: f32, sy: f32) {
        let new_k = (self.camera.k - delta * ZOOM_SENSITIVITY)
            .clamp(self.config.min_zoom, self.config.max_zoom);

        let (wx, wy) = self.screen_to_world(sx, sy);
        self.camera = Camera {
            x: sx - wx * new_k,
            y: sy - wy * new_k,
            k: new_k,
        };
    }

    /// Restore the home camera and let the layout settle visually
    pub fn reset_view(&mut self) {
        self.camera = Camera::default();
        self.alpha = 1.0;
    }

    /// Update viewport dimensions; node positions are kept, the simulation
    /// is nudged so the layout can adjust to the new center
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.alpha = self.alpha.max(0.1);
    }

    // ==================== Picking & dragging ====================

    /// Topmost node (reverse z-order) within its radius plus slack
    pub fn hit_test(&self, wx: f32, wy: f32) -> Option<Uuid> {
        for node in self.nodes.iter().rev() {
            let dx = node.x - wx;
            let dy = node.y - wy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < node.radius + self.config.hit_slack {
                return Some(node.id);
            }
        }
        None
    }

    /// Begin a drag at a screen position. Grabbing a node reheats the
    /// simulation and returns its id; empty space starts a camera pan.
    pub fn on_drag_start(&mut self, sx: f32, sy: f32) -> Option<Uuid> {
        let (wx, wy) = self.screen_to_world(sx, sy);
        if let Some(id) = self.hit_test(wx, wy) {
            self.dragging = Some(id);
            self.alpha = 0.5;
            return Some(id);
        }

        self.panning = true;
        self.last_pointer = (sx, sy);
        None
    }

    pub fn on_drag_move(&mut self, sx: f32, sy: f32) {
        if let Some(id) = self.dragging {
            let (wx, wy) = self.screen_to_world(sx, sy);
            if let Some(&i) = self.index.get(&id) {
                let node = &mut self.nodes[i];
                node.x = wx;
                node.y = wy;
                node.vx = 0.0;
                node.vy = 0.0;
            }
            self.alpha = 0.3;
            return;
        }

        if self.panning {
            self.camera.x += sx - self.last_pointer.0;
            self.camera.y += sy - self.last_pointer.1;
            self.last_pointer = (sx, sy);
        }
    }

    pub fn on_drag_end(&mut self) {
        self.dragging = None;
        self.panning = false;
    }

    /// Set the highlighted node; the renderer dims everything outside its
    /// direct neighborhood
    pub fn on_hover(&mut self, id: Option<Uuid>) {
        self.hovered = id;
    }

    /// The hovered node plus all directly connected nodes; empty when
    /// nothing is hovered
    pub fn highlight_set(&self) -> HashSet<Uuid> {
        let mut set = HashSet::new();
        if let Some(id) = self.hovered {
            set.insert(id);
            for edge in &self.edges {
                if let Some(other) = edge.other(id) {
                    set.insert(other);
                }
            }
        }
        set
    }

    // ==================== Accessors ====================

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: Uuid) -> Option<&GraphNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn hovered(&self) -> Option<Uuid> {
        self.hovered
    }

    pub fn dragging(&self) -> Option<Uuid> {
        self.dragging
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}

fn ordered_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::Flashcard;

    fn deck_with_cards(topic: &str, questions: &[&str]) -> Deck {
        let mut deck = Deck::new(topic.to_string());
        for q in questions {
            deck.cards
                .push(Flashcard::new(q.to_string(), format!("answer to {}", q)));
        }
        deck
    }

    fn built_engine() -> (GraphLayoutEngine, Vec<Deck>) {
        let mut decks = vec![
            deck_with_cards("Biology", &["cell", "osmosis", "enzyme"]),
            deck_with_cards("History", &["rome", "egypt"]),
        ];
        // Cross-deck link: cell <-> rome, declared from both sides
        let cell = decks[0].cards[0].id;
        let rome = decks[1].cards[0].id;
        decks[0].cards[0].related_card_ids.push(rome);
        decks[1].cards[0].related_card_ids.push(cell);

        let mut engine = GraphLayoutEngine::new(800.0, 600.0);
        engine.build(&decks);
        (engine, decks)
    }

    #[test]
    fn build_counts_nodes_and_edges() {
        let (engine, _decks) = built_engine();

        // 2 topics + 5 cards
        assert_eq!(engine.nodes().len(), 7);
        // 5 cluster edges + 1 deduplicated related edge
        assert_eq!(engine.edges().len(), 6);
        assert_eq!(
            engine
                .edges()
                .iter()
                .filter(|e| e.kind == EdgeKind::Related)
                .count(),
            1
        );
    }

    #[test]
    fn no_duplicate_unordered_pairs() {
        let (engine, _decks) = built_engine();

        let mut seen = HashSet::new();
        for edge in engine.edges() {
            assert!(seen.insert(ordered_pair(edge.source, edge.target)));
        }
    }

    #[test]
    fn unknown_related_ids_are_skipped() {
        let mut deck = deck_with_cards("Solo", &["one"]);
        deck.cards[0].related_card_ids.push(Uuid::new_v4());

        let mut engine = GraphLayoutEngine::new(800.0, 600.0);
        engine.build(&[deck]);

        assert_eq!(engine.edges().len(), 1); // just the cluster edge
    }

    #[test]
    fn radii_respect_bounds() {
        let (engine, _decks) = built_engine();
        let cfg = engine.config().clone();

        for node in engine.nodes() {
            match node.kind {
                NodeKind::Topic => assert_eq!(node.radius, cfg.topic_radius),
                NodeKind::Card => {
                    assert!(node.radius >= cfg.card_radius_base);
                    assert!(node.radius <= cfg.card_radius_max);
                }
            }
        }
    }

    #[test]
    fn alpha_decays_until_settled() {
        let (mut engine, _decks) = built_engine();
        assert_eq!(engine.alpha(), 1.0);

        let mut prev = engine.alpha();
        while engine.tick() {
            assert!(engine.alpha() < prev);
            prev = engine.alpha();
        }
        assert!(engine.is_settled());
        // Settled simulation no longer moves
        assert!(!engine.tick());
    }

    #[test]
    fn screen_world_round_trip() {
        let (mut engine, _decks) = built_engine();
        engine.on_wheel(-240.0, 150.0, 90.0); // arbitrary camera state

        let (sx, sy) = engine.world_to_screen(123.4, -56.7);
        let (wx, wy) = engine.screen_to_world(sx, sy);
        assert!((wx - 123.4).abs() < 1e-3);
        assert!((wy + 56.7).abs() < 1e-3);
    }

    #[test]
    fn hit_test_at_node_center() {
        let (engine, _decks) = built_engine();
        // The topmost node (last in z-order) is always its own hit at its
        // exact center; no other node can win the reverse scan there
        let node = engine.nodes().last().unwrap();
        assert_eq!(engine.hit_test(node.x, node.y), Some(node.id));

        // Far away from everything there is no hit
        assert_eq!(engine.hit_test(1.0e6, 1.0e6), None);
    }

    #[test]
    fn wheel_zoom_keeps_cursor_point_fixed() {
        let (mut engine, _decks) = built_engine();
        let (sx, sy) = (320.0, 240.0);

        let (wx, wy) = engine.screen_to_world(sx, sy);
        engine.on_wheel(-400.0, sx, sy);
        let (sx2, sy2) = engine.world_to_screen(wx, wy);

        assert!((sx2 - sx).abs() < 1e-3);
        assert!((sy2 - sy).abs() < 1e-3);
        assert!(engine.camera().k > 0.6);
    }

    #[test]
    fn zoom_is_clamped() {
        let (mut engine, _decks) = built_engine();
        engine.on_wheel(100_000.0, 0.0, 0.0);
        assert_eq!(engine.camera().k, engine.config().min_zoom);
        engine.on_wheel(-100_000.0, 0.0, 0.0);
        assert_eq!(engine.camera().k, engine.config().max_zoom);
    }

    #[test]
    fn dragging_pins_node_and_reheats() {
        let (mut engine, _decks) = built_engine();
        // Settle first
        while engine.tick() {}

        let id = engine.nodes()[0].id;
        let (sx, sy) = {
            let n = engine.node(id).unwrap();
            engine.world_to_screen(n.x, n.y)
        };
        let grabbed = engine.on_drag_start(sx, sy);
        assert!(grabbed.is_some());

        let target_screen = (sx + 40.0, sy + 40.0);
        engine.on_drag_move(target_screen.0, target_screen.1);
        let expected = engine.screen_to_world(target_screen.0, target_screen.1);

        let node = engine.node(grabbed.unwrap()).unwrap();
        assert!((node.x - expected.0).abs() < 1e-3);
        assert!((node.y - expected.1).abs() < 1e-3);
        assert!(!engine.is_settled()); // drag reheated the simulation

        // While dragged, ticks do not move the node away from the pointer
        let (px, py) = (node.x, node.y);
        engine.tick();
        let node = engine.node(grabbed.unwrap()).unwrap();
        assert!((node.x - px).abs() < 1e-3);
        assert!((node.y - py).abs() < 1e-3);

        engine.on_drag_end();
        assert!(engine.dragging().is_none());
    }

    #[test]
    fn empty_space_drag_pans_camera() {
        let (mut engine, _decks) = built_engine();
        // Far away from any spawn position
        let grabbed = engine.on_drag_start(-10_000.0, -10_000.0);
        assert!(grabbed.is_none());

        let before = engine.camera();
        engine.on_drag_move(-9_970.0, -9_990.0);
        let after = engine.camera();
        assert!((after.x - before.x - 30.0).abs() < 1e-3);
        assert!((after.y - before.y - 10.0).abs() < 1e-3);
        assert_eq!(after.k, before.k);
    }

    #[test]
    fn hover_neighborhood() {
        let (mut engine, decks) = built_engine();
        let topic = decks[0].id;
        engine.on_hover(Some(topic));

        let set = engine.highlight_set();
        assert!(set.contains(&topic));
        // Every card of the deck is a direct neighbor of its topic
        for card in &decks[0].cards {
            assert!(set.contains(&card.id));
        }
        // The other topic is not
        assert!(!set.contains(&decks[1].id));

        engine.on_hover(None);
        assert!(engine.highlight_set().is_empty());
    }

    #[test]
    fn resize_nudges_alpha_without_moving_nodes() {
        let (mut engine, _decks) = built_engine();
        while engine.tick() {}

        let positions: Vec<(f32, f32)> = engine.nodes().iter().map(|n| (n.x, n.y)).collect();
        engine.on_resize(1024.0, 768.0);

        assert!(!engine.is_settled());
        for (node, (x, y)) in engine.nodes().iter().zip(positions) {
            assert_eq!((node.x, node.y), (x, y));
        }
    }

    #[test]
    fn rebuild_resets_energy_and_camera() {
        let (mut engine, decks) = built_engine();
        while engine.tick() {}
        engine.on_wheel(-300.0, 10.0, 10.0);

        engine.build(&decks);
        assert_eq!(engine.alpha(), 1.0);
        assert_eq!(engine.camera(), Camera::default());
    }
}
