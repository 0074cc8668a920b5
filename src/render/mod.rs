//! Canvas rendering layer
//!
//! This module owns the synchronization between graph projections and a
//! pluggable rendering engine:
//! - A narrow engine trait with one concrete force-layout binding
//! - Incremental element diffing that preserves unrelated positions
//! - Named layout strategies with fixed tuned parameters
//! - The closed label-to-style vocabulary with an explicit fallback

pub mod canvas;
pub mod engine;
pub mod force;
pub mod layout;
pub mod style;

// Re-export main types
pub use canvas::GraphCanvas;
pub use engine::{
    CanvasEvent, EdgeElement, EventHandler, Journal, NodeElement, RecordingEngine, RenderEngine,
    RenderError,
};
pub use force::{ForceGraphEngine, ViewTransform, HIT_RADIUS, NODE_RADIUS};
pub use layout::{LayoutKind, LayoutParams};
pub use style::{
    edge_color, legend, node_color, EntityKind, Legend, LegendEntry, DEFAULT_COLOR,
    EXPANDED_BORDER_COLOR, SELECTION_COLOR,
};
