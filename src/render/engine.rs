//! The rendering-engine seam
//!
//! The drawing engine is an external collaborator behind a deliberately
//! narrow trait: element add/remove/update, named layout runs, single
//! selection, viewport control and an upward event stream. The canvas
//! synchronizer drives any implementation through this surface only.

use super::layout::LayoutKind;
use crate::graph::{DisplayOptions, Entity, PropertyMap, Relationship};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors an engine may report; the canvas logs these and keeps its last
/// good state rather than propagating them
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout {0} failed: {1}")]
    Layout(LayoutKind, String),

    #[error("engine already destroyed")]
    Destroyed,
}

/// Interaction events emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasEvent {
    /// Single click on a node: select it
    NodeClicked(String),
    /// Double click on a node: request expansion
    NodeDoubleClicked(String),
    /// Single click on an edge: select it
    EdgeClicked(String),
    /// Click on empty canvas: clear the selection
    BackgroundClicked,
}

/// Callback receiving engine events
pub type EventHandler = Box<dyn FnMut(CanvasEvent) + Send>;

/// Element data for a rendered node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeElement {
    pub id: String,
    pub name: String,
    pub label: String,
    pub relationship_count: u32,
    pub is_expanded: bool,
    pub properties: PropertyMap,
}

impl NodeElement {
    pub fn from_entity(entity: &Entity) -> Self {
        NodeElement {
            id: entity.id.as_str().to_string(),
            name: entity.name.clone(),
            label: entity.label.clone(),
            relationship_count: entity.relationship_count,
            is_expanded: entity.is_expanded,
            properties: entity.properties.clone(),
        }
    }

    /// True when a data push to the engine is warranted. Only the fields
    /// that affect what is drawn are compared, so unrelated refreshes do
    /// not cause re-render churn.
    pub fn data_differs(&self, other: &NodeElement) -> bool {
        self.name != other.name
            || self.label != other.label
            || self.is_expanded != other.is_expanded
            || self.relationship_count != other.relationship_count
    }
}

/// Element data for a rendered edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeElement {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub properties: PropertyMap,
}

impl EdgeElement {
    pub fn from_relationship(rel: &Relationship) -> Self {
        EdgeElement {
            id: rel.id.as_str().to_string(),
            source: rel.source_id.as_str().to_string(),
            target: rel.target_id.as_str().to_string(),
            label: rel.label.clone(),
            properties: rel.properties.clone(),
        }
    }
}

/// The narrow surface a drawing engine must provide
pub trait RenderEngine {
    fn add_nodes(&mut self, nodes: &[NodeElement]);
    fn add_edges(&mut self, edges: &[EdgeElement]);
    fn remove_nodes(&mut self, ids: &[String]);
    fn remove_edges(&mut self, ids: &[String]);
    fn update_node_data(&mut self, node: &NodeElement);

    /// Run a layout strategy over the current elements. Unanimated runs
    /// settle fully; animated runs move the delta gently.
    fn run_layout(&mut self, kind: LayoutKind, animate: bool) -> Result<(), RenderError>;

    /// Set the single selected element, or clear with None
    fn set_selected(&mut self, id: Option<&str>);
    fn selected(&self) -> Option<String>;

    fn set_display(&mut self, options: DisplayOptions);

    /// Fit the viewport to the current elements
    fn fit(&mut self);
    fn resize(&mut self, width: f32, height: f32);

    /// Register the upward event callback (replaces any previous one)
    fn on_event(&mut self, handler: EventHandler);

    /// Detach handlers and release the engine; further calls are no-ops
    fn destroy(&mut self);
    fn is_destroyed(&self) -> bool;
}

// ============================================================
// Recording engine
// ============================================================

/// Everything a [`RecordingEngine`] observed, for assertions
#[derive(Debug, Default, Clone)]
pub struct Journal {
    pub added_nodes: Vec<String>,
    pub removed_nodes: Vec<String>,
    pub added_edges: Vec<String>,
    pub removed_edges: Vec<String>,
    pub updated_nodes: Vec<String>,
    pub layout_runs: Vec<(LayoutKind, bool)>,
    pub selections: Vec<Option<String>>,
    pub fits: usize,
}

impl Journal {
    /// How many times the given node id was removed
    pub fn node_removals(&self, id: &str) -> usize {
        self.removed_nodes.iter().filter(|r| r.as_str() == id).count()
    }

    /// How many times the given edge id was removed
    pub fn edge_removals(&self, id: &str) -> usize {
        self.removed_edges.iter().filter(|r| r.as_str() == id).count()
    }
}

/// An engine double that draws nothing and records every call. Used by
/// the integration suite and the demo binary to observe exactly what an
/// incremental sync pushed to the engine.
#[derive(Default)]
pub struct RecordingEngine {
    journal: Arc<Mutex<Journal>>,
    selected: Option<String>,
    handler: Option<EventHandler>,
    destroyed: bool,
}

impl RecordingEngine {
    /// Create the engine together with a shared handle onto its journal
    pub fn new() -> (Self, Arc<Mutex<Journal>>) {
        let engine = RecordingEngine::default();
        let journal = Arc::clone(&engine.journal);
        (engine, journal)
    }

    /// Feed an event through the registered handler, standing in for a
    /// pointer interaction on a real canvas
    pub fn emit(&mut self, event: CanvasEvent) {
        if let Some(handler) = &mut self.handler {
            handler(event);
        }
    }
}

impl RenderEngine for RecordingEngine {
    fn add_nodes(&mut self, nodes: &[NodeElement]) {
        let mut journal = self.journal.lock().unwrap();
        journal
            .added_nodes
            .extend(nodes.iter().map(|node| node.id.clone()));
    }

    fn add_edges(&mut self, edges: &[EdgeElement]) {
        let mut journal = self.journal.lock().unwrap();
        journal
            .added_edges
            .extend(edges.iter().map(|edge| edge.id.clone()));
    }

    fn remove_nodes(&mut self, ids: &[String]) {
        self.journal.lock().unwrap().removed_nodes.extend_from_slice(ids);
    }

    fn remove_edges(&mut self, ids: &[String]) {
        self.journal.lock().unwrap().removed_edges.extend_from_slice(ids);
    }

    fn update_node_data(&mut self, node: &NodeElement) {
        self.journal.lock().unwrap().updated_nodes.push(node.id.clone());
    }

    fn run_layout(&mut self, kind: LayoutKind, animate: bool) -> Result<(), RenderError> {
        if self.destroyed {
            return Err(RenderError::Destroyed);
        }
        self.journal.lock().unwrap().layout_runs.push((kind, animate));
        Ok(())
    }

    fn set_selected(&mut self, id: Option<&str>) {
        self.selected = id.map(String::from);
        self.journal
            .lock()
            .unwrap()
            .selections
            .push(self.selected.clone());
    }

    fn selected(&self) -> Option<String> {
        self.selected.clone()
    }

    fn set_display(&mut self, _options: DisplayOptions) {}

    fn fit(&mut self) {
        self.journal.lock().unwrap().fits += 1;
    }

    fn resize(&mut self, _width: f32, _height: f32) {}

    fn on_event(&mut self, handler: EventHandler) {
        self.handler = Some(handler);
    }

    fn destroy(&mut self) {
        self.handler = None;
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
