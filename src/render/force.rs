//! Rendering engine backed by the `force_graph` simulation crate
//!
//! Positions live in graph space; a drawing shell reads them together
//! with the view transform and draws with whatever surface it has. The
//! simulation is rebuilt per layout run from the retained position map,
//! so surviving nodes keep their places across incremental syncs and
//! only newly placed nodes travel far.

use super::engine::{
    CanvasEvent, EdgeElement, EventHandler, NodeElement, RenderEngine, RenderError,
};
use super::layout::{LayoutKind, LayoutParams};
use crate::graph::DisplayOptions;
use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use indexmap::IndexMap;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::collections::{HashMap, VecDeque};
use std::f32::consts::PI;
use tracing::debug;

/// Drawn node radius in graph space
pub const NODE_RADIUS: f32 = 5.0;

/// Pointer hit radius around a node center
pub const HIT_RADIUS: f32 = 12.0;

/// Pointer hit distance around an edge segment
const EDGE_HIT_DISTANCE: f32 = 6.0;

/// Simulation steps for an unanimated run (full convergence)
const SETTLE_STEPS: u32 = 300;

const SIM_TICK: f32 = 1.0 / 60.0;

/// Pan/zoom state mapping graph space to screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub x: f32,
    pub y: f32,
    pub k: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        ViewTransform {
            x: 0.0,
            y: 0.0,
            k: 1.0,
        }
    }
}

/// Per-node payload inside the simulation, mapping back to element ids
struct SimNode {
    id: String,
}

/// `RenderEngine` implementation over `force_graph`
pub struct ForceGraphEngine {
    nodes: IndexMap<String, NodeElement>,
    edges: IndexMap<String, EdgeElement>,
    positions: FxHashMap<String, (f32, f32)>,
    transform: ViewTransform,
    selected: Option<String>,
    display: DisplayOptions,
    handler: Option<EventHandler>,
    width: f32,
    height: f32,
    destroyed: bool,
}

impl ForceGraphEngine {
    pub fn new(width: f32, height: f32) -> Self {
        ForceGraphEngine {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            positions: FxHashMap::default(),
            transform: ViewTransform::default(),
            selected: None,
            display: DisplayOptions::default(),
            handler: None,
            width,
            height,
            destroyed: false,
        }
    }

    /// Current position of a node in graph space
    pub fn position(&self, id: &str) -> Option<(f32, f32)> {
        self.positions.get(id).copied()
    }

    /// All positions, for a drawing shell
    pub fn positions(&self) -> impl Iterator<Item = (&str, (f32, f32))> {
        self.positions.iter().map(|(id, pos)| (id.as_str(), *pos))
    }

    pub fn view_transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    fn screen_to_graph(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            (sx - self.transform.x) / self.transform.k,
            (sy - self.transform.y) / self.transform.k,
        )
    }

    /// The topmost node under a screen-space point, if any
    pub fn node_at(&self, sx: f32, sy: f32) -> Option<&str> {
        let (gx, gy) = self.screen_to_graph(sx, sy);
        let mut found = None;
        for (id, (x, y)) in &self.positions {
            let (dx, dy) = (x - gx, y - gy);
            if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
                found = Some(id.as_str());
            }
        }
        found
    }

    /// The first edge whose segment passes under a screen-space point
    pub fn edge_at(&self, sx: f32, sy: f32) -> Option<&str> {
        let (gx, gy) = self.screen_to_graph(sx, sy);
        self.edges.values().find_map(|edge| {
            let a = self.positions.get(&edge.source)?;
            let b = self.positions.get(&edge.target)?;
            if point_segment_distance((gx, gy), *a, *b) < EDGE_HIT_DISTANCE {
                Some(edge.id.as_str())
            } else {
                None
            }
        })
    }

    /// Single pointer press: node hit wins over edge hit, anything else
    /// is a background click
    pub fn pointer_press(&mut self, sx: f32, sy: f32) {
        if self.destroyed {
            return;
        }
        let event = if let Some(id) = self.node_at(sx, sy) {
            CanvasEvent::NodeClicked(id.to_string())
        } else if let Some(id) = self.edge_at(sx, sy) {
            CanvasEvent::EdgeClicked(id.to_string())
        } else {
            CanvasEvent::BackgroundClicked
        };
        self.dispatch(event);
    }

    /// Double pointer press on a node requests expansion
    pub fn pointer_double_press(&mut self, sx: f32, sy: f32) {
        if self.destroyed {
            return;
        }
        if let Some(id) = self.node_at(sx, sy) {
            let event = CanvasEvent::NodeDoubleClicked(id.to_string());
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: CanvasEvent) {
        if let Some(handler) = &mut self.handler {
            handler(event);
        }
    }

    /// Initial placement for a node the simulation has not seen: a circle
    /// around the viewport center, optionally jittered
    fn initial_position(&self, ordinal: usize, total: usize, params: &LayoutParams) -> (f32, f32) {
        let angle = ordinal as f32 * 2.0 * PI / total.max(1) as f32;
        let radius = params.ideal_edge_length;
        let (mut x, mut y) = (
            self.width / 2.0 + radius * angle.cos(),
            self.height / 2.0 + radius * angle.sin(),
        );
        if params.randomize {
            let mut rng = rand::thread_rng();
            x += rng.gen_range(-radius..radius) * 0.5;
            y += rng.gen_range(-radius..radius) * 0.5;
        }
        (x, y)
    }

    fn run_force_layout(&mut self, params: LayoutParams, animate: bool) {
        let mut sim: ForceGraph<SimNode, ()> = ForceGraph::new(SimulationParameters {
            force_charge: params.repulsion,
            force_spring: params.spring,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
        });

        let total = self.nodes.len();
        let mut index_of: HashMap<String, DefaultNodeIdx> = HashMap::with_capacity(total);
        for (ordinal, id) in self.nodes.keys().enumerate() {
            let (x, y) = match self.positions.get(id) {
                Some(pos) => *pos,
                None => self.initial_position(ordinal, total, &params),
            };
            let idx = sim.add_node(NodeData {
                x,
                y,
                mass: 10.0,
                is_anchor: false,
                user_data: SimNode { id: id.clone() },
            });
            index_of.insert(id.clone(), idx);
        }

        for edge in self.edges.values() {
            if let (Some(&source), Some(&target)) =
                (index_of.get(&edge.source), index_of.get(&edge.target))
            {
                sim.add_edge(source, target, EdgeData::default());
            }
        }

        // Step count stands in for wall-clock animation: a short settle
        // nudges the delta, a long one converges from scratch
        let steps = if animate {
            (params.animation_ms / 16).max(1)
        } else {
            SETTLE_STEPS
        };
        for _ in 0..steps {
            sim.update(SIM_TICK);
        }

        let positions = &mut self.positions;
        sim.visit_nodes(|node| {
            positions.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
        });
    }

    /// Layered top-down placement: roots (no incoming edge) on the first
    /// row, successors below, unreachable remainder on a final row
    fn run_hierarchical_layout(&mut self, params: LayoutParams) {
        let mut in_degree: HashMap<&str, usize> =
            self.nodes.keys().map(|id| (id.as_str(), 0)).collect();
        let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in self.edges.values() {
            if in_degree.contains_key(edge.source.as_str())
                && in_degree.contains_key(edge.target.as_str())
            {
                *in_degree.get_mut(edge.target.as_str()).unwrap() += 1;
                outgoing
                    .entry(edge.source.as_str())
                    .or_default()
                    .push(edge.target.as_str());
            }
        }

        let mut layer_of: HashMap<&str, usize> = HashMap::new();
        let mut queue: VecDeque<&str> = self
            .nodes
            .keys()
            .map(String::as_str)
            .filter(|id| in_degree[id] == 0)
            .collect();
        for &root in &queue {
            layer_of.insert(root, 0);
        }
        while let Some(id) = queue.pop_front() {
            let next = layer_of[id] + 1;
            for &successor in outgoing.get(id).into_iter().flatten() {
                if !layer_of.contains_key(successor) {
                    layer_of.insert(successor, next);
                    queue.push_back(successor);
                }
            }
        }
        let deepest = layer_of.values().copied().max().unwrap_or(0);

        let mut layers: Vec<Vec<&str>> = vec![Vec::new(); deepest + 2];
        for id in self.nodes.keys() {
            // Cycle members never got a layer; park them on the last row
            let layer = layer_of.get(id.as_str()).copied().unwrap_or(deepest + 1);
            layers[layer].push(id.as_str());
        }

        let mut placed: Vec<(String, (f32, f32))> = Vec::with_capacity(self.nodes.len());
        for (layer, members) in layers.iter().enumerate() {
            let row_width = members.len().saturating_sub(1) as f32 * params.node_separation;
            for (slot, id) in members.iter().enumerate() {
                let x = self.width / 2.0 - row_width / 2.0 + slot as f32 * params.node_separation;
                let y = params.ideal_edge_length * (layer as f32 + 1.0);
                placed.push((id.to_string(), (x, y)));
            }
        }
        self.positions.extend(placed);
    }

    /// Rings by connectivity: the best-connected node at the center,
    /// ever-wider rings outwards
    fn run_concentric_layout(&mut self, params: LayoutParams) {
        let mut degree: HashMap<&str, usize> =
            self.nodes.keys().map(|id| (id.as_str(), 0)).collect();
        for edge in self.edges.values() {
            if let Some(count) = degree.get_mut(edge.source.as_str()) {
                *count += 1;
            }
            if let Some(count) = degree.get_mut(edge.target.as_str()) {
                *count += 1;
            }
        }

        let mut ordered: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ordered.sort_by(|a, b| degree[b].cmp(&degree[a]));

        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let mut placed: Vec<(String, (f32, f32))> = Vec::with_capacity(ordered.len());
        let mut remaining = ordered.as_slice();
        let mut ring = 0usize;
        while !remaining.is_empty() {
            let capacity = if ring == 0 { 1 } else { ring * 8 };
            let (members, rest) = remaining.split_at(capacity.min(remaining.len()));
            let radius = ring as f32 * params.ideal_edge_length;
            for (slot, id) in members.iter().enumerate() {
                let angle = slot as f32 * 2.0 * PI / members.len() as f32;
                placed.push((
                    id.to_string(),
                    (cx + radius * angle.cos(), cy + radius * angle.sin()),
                ));
            }
            remaining = rest;
            ring += 1;
        }
        self.positions.extend(placed);
    }
}

impl RenderEngine for ForceGraphEngine {
    fn add_nodes(&mut self, nodes: &[NodeElement]) {
        if self.destroyed {
            return;
        }
        for node in nodes {
            self.nodes.insert(node.id.clone(), node.clone());
        }
    }

    fn add_edges(&mut self, edges: &[EdgeElement]) {
        if self.destroyed {
            return;
        }
        for edge in edges {
            self.edges.insert(edge.id.clone(), edge.clone());
        }
    }

    fn remove_nodes(&mut self, ids: &[String]) {
        for id in ids {
            self.nodes.shift_remove(id);
            self.positions.remove(id);
            if self.selected.as_deref() == Some(id.as_str()) {
                self.selected = None;
            }
        }
    }

    fn remove_edges(&mut self, ids: &[String]) {
        for id in ids {
            self.edges.shift_remove(id);
            if self.selected.as_deref() == Some(id.as_str()) {
                self.selected = None;
            }
        }
    }

    fn update_node_data(&mut self, node: &NodeElement) {
        if let Some(existing) = self.nodes.get_mut(&node.id) {
            *existing = node.clone();
        }
    }

    fn run_layout(&mut self, kind: LayoutKind, animate: bool) -> Result<(), RenderError> {
        if self.destroyed {
            return Err(RenderError::Destroyed);
        }
        if self.nodes.is_empty() {
            return Ok(());
        }
        debug!(layout = %kind, animate, nodes = self.nodes.len(), "running layout");
        let params = kind.params();
        match kind {
            LayoutKind::Force | LayoutKind::ForceCompact => self.run_force_layout(params, animate),
            LayoutKind::Hierarchical => self.run_hierarchical_layout(params),
            LayoutKind::Concentric => self.run_concentric_layout(params),
        }
        self.fit();
        Ok(())
    }

    fn set_selected(&mut self, id: Option<&str>) {
        // Single selection: whatever was selected before is dropped first
        self.selected = id.map(String::from);
    }

    fn selected(&self) -> Option<String> {
        self.selected.clone()
    }

    fn set_display(&mut self, options: DisplayOptions) {
        self.display = options;
    }

    fn fit(&mut self) {
        if self.positions.is_empty() {
            self.transform = ViewTransform::default();
            return;
        }
        let mut min = (f32::MAX, f32::MAX);
        let mut max = (f32::MIN, f32::MIN);
        for (x, y) in self.positions.values() {
            min.0 = min.0.min(*x);
            min.1 = min.1.min(*y);
            max.0 = max.0.max(*x);
            max.1 = max.1.max(*y);
        }
        let padding = 50.0;
        let content = ((max.0 - min.0).max(1.0), (max.1 - min.1).max(1.0));
        let k = ((self.width - padding * 2.0) / content.0)
            .min((self.height - padding * 2.0) / content.1)
            .clamp(0.1, 1.5);
        let center = ((min.0 + max.0) / 2.0, (min.1 + max.1) / 2.0);
        self.transform = ViewTransform {
            x: self.width / 2.0 - center.0 * k,
            y: self.height / 2.0 - center.1 * k,
            k,
        };
    }

    fn resize(&mut self, width: f32, height: f32) {
        if self.destroyed {
            return;
        }
        self.width = width;
        self.height = height;
    }

    fn on_event(&mut self, handler: EventHandler) {
        self.handler = Some(handler);
    }

    fn destroy(&mut self) {
        self.handler = None;
        self.nodes.clear();
        self.edges.clear();
        self.positions.clear();
        self.selected = None;
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

fn point_segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let length_sq = abx * abx + aby * aby;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / length_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * abx, a.1 + t * aby);
    let (dx, dy) = (p.0 - cx, p.1 - cy);
    (dx * dx + dy * dy).sqrt()
}
