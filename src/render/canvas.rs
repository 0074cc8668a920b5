//! Incremental canvas synchronizer
//!
//! Keeps a rendering engine's element set in step with successive graph
//! projections without tearing down unrelated elements, so node
//! positions survive refreshes and the view does not jump:
//!
//! 1. diff current vs previous node/edge id sets
//! 2. remove what disappeared, add what appeared (with full data)
//! 3. for survivors, push a data update only when a drawn field changed
//! 4. re-run the layout only when elements were added or on the first
//!    population; pure removals and data-only updates keep positions
//! 5. first population runs unanimated, later deltas animate
//!
//! Engine failures are logged and swallowed: the canvas stays on its
//! last good state.

use super::engine::{EventHandler, NodeElement, RenderEngine};
use super::layout::LayoutKind;
use crate::graph::{DisplayOptions, GraphView};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

/// Owns a rendering engine and the previously rendered element set
pub struct GraphCanvas {
    engine: Box<dyn RenderEngine>,
    layout: LayoutKind,
    prev_nodes: FxHashMap<String, NodeElement>,
    prev_edges: FxHashSet<String>,
}

impl GraphCanvas {
    pub fn new(engine: Box<dyn RenderEngine>) -> Self {
        GraphCanvas::with_layout(engine, LayoutKind::default())
    }

    pub fn with_layout(engine: Box<dyn RenderEngine>, layout: LayoutKind) -> Self {
        GraphCanvas {
            engine,
            layout,
            prev_nodes: FxHashMap::default(),
            prev_edges: FxHashSet::default(),
        }
    }

    /// Register the upward interaction handler
    pub fn on_event(&mut self, handler: EventHandler) {
        self.engine.on_event(handler);
    }

    /// Direct access to the engine, for drawing shells
    pub fn engine(&self) -> &dyn RenderEngine {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> &mut dyn RenderEngine {
        self.engine.as_mut()
    }

    /// Synchronize the engine's element set with a new projection
    pub fn sync(&mut self, view: &GraphView) {
        if self.engine.is_destroyed() {
            return;
        }

        let current_nodes: FxHashMap<String, NodeElement> = view
            .nodes
            .iter()
            .map(|entity| {
                let element = NodeElement::from_entity(entity);
                (element.id.clone(), element)
            })
            .collect();
        let current_edges: FxHashSet<String> = view
            .edges
            .iter()
            .map(|rel| rel.id.as_str().to_string())
            .collect();

        let first_population = self.prev_nodes.is_empty();

        let removed_edges: Vec<String> = self
            .prev_edges
            .iter()
            .filter(|id| !current_edges.contains(*id))
            .cloned()
            .collect();
        let removed_nodes: Vec<String> = self
            .prev_nodes
            .keys()
            .filter(|id| !current_nodes.contains_key(*id))
            .cloned()
            .collect();

        // Edges first so the engine never sees a dangling edge
        if !removed_edges.is_empty() {
            self.engine.remove_edges(&removed_edges);
        }
        if !removed_nodes.is_empty() {
            self.engine.remove_nodes(&removed_nodes);
        }

        let new_nodes: Vec<NodeElement> = view
            .nodes
            .iter()
            .filter(|entity| !self.prev_nodes.contains_key(entity.id.as_str()))
            .map(NodeElement::from_entity)
            .collect();
        if !new_nodes.is_empty() {
            self.engine.add_nodes(&new_nodes);
        }

        let new_edges: Vec<_> = view
            .edges
            .iter()
            .filter(|rel| !self.prev_edges.contains(rel.id.as_str()))
            .map(super::engine::EdgeElement::from_relationship)
            .collect();
        if !new_edges.is_empty() {
            self.engine.add_edges(&new_edges);
        }

        // Survivors: push data only when a drawn field actually changed
        for (id, element) in &current_nodes {
            if let Some(previous) = self.prev_nodes.get(id) {
                if element.data_differs(previous) {
                    self.engine.update_node_data(element);
                }
            }
        }

        let added = !new_nodes.is_empty() || !new_edges.is_empty();
        if added || first_population {
            let animate = !first_population && !new_nodes.is_empty();
            self.run_layout_logged(self.layout, animate);
        } else {
            debug!(
                removed = removed_nodes.len() + removed_edges.len(),
                "sync without layout re-run"
            );
        }

        self.prev_nodes = current_nodes;
        self.prev_edges = current_edges;
    }

    /// Mirror the application's single selection onto the engine,
    /// touching native state only when it actually differs
    pub fn sync_selection(&mut self, selection: Option<&str>) {
        if self.engine.is_destroyed() {
            return;
        }
        let current = self.engine.selected();
        if current.as_deref() != selection {
            self.engine.set_selected(selection);
        }
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Switch the active strategy and re-run it with animation
    pub fn set_layout(&mut self, kind: LayoutKind) {
        if self.layout == kind {
            return;
        }
        self.layout = kind;
        self.run_layout_logged(kind, true);
    }

    /// Re-run the active layout, animated (the manual restart control)
    pub fn run_layout(&mut self) {
        self.run_layout_logged(self.layout, true);
    }

    fn run_layout_logged(&mut self, kind: LayoutKind, animate: bool) {
        if let Err(err) = self.engine.run_layout(kind, animate) {
            warn!(layout = %kind, error = %err, "layout run failed");
        }
    }

    pub fn set_display_options(&mut self, options: DisplayOptions) {
        self.engine.set_display(options);
    }

    /// Fit the viewport to the rendered elements
    pub fn fit(&mut self) {
        if !self.engine.is_destroyed() {
            self.engine.fit();
        }
    }

    /// Container resize: guard against an already-destroyed engine, then
    /// resize and re-fit
    pub fn handle_resize(&mut self, width: f32, height: f32) {
        if self.engine.is_destroyed() {
            return;
        }
        self.engine.resize(width, height);
        self.engine.fit();
    }

    /// Release the engine; the canvas becomes inert
    pub fn destroy(&mut self) {
        self.engine.destroy();
        self.prev_nodes.clear();
        self.prev_edges.clear();
    }

    pub fn is_destroyed(&self) -> bool {
        self.engine.is_destroyed()
    }
}
