//! Nexus
//!
//! An interactive knowledge-graph exploration engine: analysts search an
//! external relationships backend, grow a local graph of entities and
//! connections, and watch it render incrementally on a force-layout
//! canvas.
//!
//! # Architecture
//!
//! - `graph`: the normalized store, id-keyed entity/relationship maps
//!   with an incident-relationship index and filtered projection
//! - `session`: the store's sole mutator, with batched updates,
//!   selection, expansion tracking and stale-response fencing
//! - `render`: the canvas, incremental element diffing over a narrow
//!   engine trait with a `force_graph` binding
//! - `api`: the backend REST client, search/expand with TTL response
//!   caching and debounced input
//!
//! The backend wire contract is fixed and external; this crate consumes
//! it and never defines it.
//!
//! ## Example Usage
//!
//! ```rust
//! use nexus::graph::{RawEdge, RawGraph, RawNode};
//! use nexus::session::GraphSession;
//!
//! let mut session = GraphSession::with_graph(RawGraph {
//!     nodes: vec![
//!         RawNode::new("a", "Acme Corp", "COMPANY"),
//!         RawNode::new("p", "Jane Doe", "PERSON"),
//!     ],
//!     edges: vec![RawEdge::new("r", "p", "a", "is a director of")],
//! });
//!
//! let view = session.filtered_view();
//! assert_eq!(view.nodes.len(), 2);
//! assert_eq!(view.edges.len(), 1);
//!
//! session.select_entity("a");
//! assert!(session.selected_entity().is_some());
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod graph;
pub mod render;
pub mod session;

// Re-export main types for convenience
pub use graph::{
    ConnectionRange, DisplayOptions, Entity, EntityId, EntityPatch, GraphFilter, GraphStats,
    GraphStore, GraphView, PropertyMap, PropertyValue, RawEdge, RawGraph, RawNode, Relationship,
    RelationshipId, TypeFilter,
};

pub use session::{AddOutcome, GraphOp, GraphSession, MergeOutcome, Selection, SessionStats};

pub use render::{
    CanvasEvent, EntityKind, ForceGraphEngine, GraphCanvas, LayoutKind, RecordingEngine,
    RenderEngine, RenderError,
};

pub use api::{ApiClient, ApiConfig, ApiError, Debouncer, ResponseCache};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
