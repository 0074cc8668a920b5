//! Visual style tables for the canvas
//!
//! The entity label vocabulary is small and closed in practice, so the
//! style mapping is a fixed enum with an explicit fallback; the store
//! itself still tolerates arbitrary labels.

use crate::graph::GraphView;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Fallback fill for unknown entity labels and edge types
pub const DEFAULT_COLOR: &str = "#95A5A6";

/// Highlight applied to the selected element
pub const SELECTION_COLOR: &str = "#FF9900";

/// Border color marking an expanded node
pub const EXPANDED_BORDER_COLOR: &str = "#27AE60";

/// Node border in the unselected state
pub const NODE_BORDER_COLOR: &str = "#34495E";

/// The closed entity style vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Person,
    Organization,
    Company,
    Location,
    Event,
    Product,
    Technology,
    Unknown,
}

impl EntityKind {
    /// Parse a store label, falling back to `Unknown` for anything
    /// outside the vocabulary
    pub fn from_label(label: &str) -> Self {
        match label {
            "PERSON" => EntityKind::Person,
            "ORGANIZATION" => EntityKind::Organization,
            "COMPANY" => EntityKind::Company,
            "LOCATION" => EntityKind::Location,
            "EVENT" => EntityKind::Event,
            "PRODUCT" => EntityKind::Product,
            "TECHNOLOGY" => EntityKind::Technology,
            _ => EntityKind::Unknown,
        }
    }

    /// Node fill color
    pub fn color(&self) -> &'static str {
        match self {
            EntityKind::Person => "#F8BBD9",
            EntityKind::Organization => "#4ECDC4",
            EntityKind::Company => "#45B7D1",
            EntityKind::Location => "#96CEB4",
            EntityKind::Event => "#FFEAA7",
            EntityKind::Product => "#DDA0DD",
            EntityKind::Technology => "#98D8C8",
            EntityKind::Unknown => DEFAULT_COLOR,
        }
    }

    /// Icon name shown next to the entity in detail panels
    pub fn icon(&self) -> &'static str {
        match self {
            EntityKind::Person => "user",
            EntityKind::Organization => "landmark",
            EntityKind::Company => "building",
            EntityKind::Location => "map-pin",
            EntityKind::Event => "calendar",
            EntityKind::Product => "package",
            EntityKind::Technology => "cpu",
            EntityKind::Unknown => "circle",
        }
    }
}

/// Node fill color for a store label
pub fn node_color(label: &str) -> &'static str {
    EntityKind::from_label(label).color()
}

/// Edge color per relationship type, gray for unknown types
pub fn edge_color(relationship_type: &str) -> &'static str {
    match relationship_type {
        "is a supplier/partner of" => "#FFC107",
        "is a director of" => "#F8BBD9",
        "is a customer of" => "#4CAF50",
        "is a competitor of" => "#D32F2F",
        "is an employee/director of" => "#F8BBD9",
        _ => DEFAULT_COLOR,
    }
}

/// One legend row: a label and its swatch color
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

/// Legend data for the currently rendered view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Legend {
    pub node_labels: Vec<LegendEntry>,
    pub edge_labels: Vec<LegendEntry>,
}

/// Unique node and edge labels of a view, paired with their colors.
/// Empty edge labels are omitted.
pub fn legend(view: &GraphView) -> Legend {
    let mut node_labels: IndexSet<&str> = IndexSet::new();
    for node in &view.nodes {
        node_labels.insert(node.label.as_str());
    }

    let mut edge_labels: IndexSet<&str> = IndexSet::new();
    for edge in &view.edges {
        if !edge.label.trim().is_empty() {
            edge_labels.insert(edge.label.as_str());
        }
    }

    Legend {
        node_labels: node_labels
            .into_iter()
            .map(|label| LegendEntry {
                label: label.to_string(),
                color: node_color(label),
            })
            .collect(),
        edge_labels: edge_labels
            .into_iter()
            .map(|label| LegendEntry {
                label: label.to_string(),
                color: edge_color(label),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphStore, RawEdge, RawGraph, RawNode};

    #[test]
    fn test_known_labels_have_distinct_colors() {
        assert_eq!(node_color("PERSON"), "#F8BBD9");
        assert_eq!(node_color("COMPANY"), "#45B7D1");
        assert_ne!(node_color("PERSON"), node_color("TECHNOLOGY"));
    }

    #[test]
    fn test_unknown_label_falls_back() {
        assert_eq!(EntityKind::from_label("SPACESHIP"), EntityKind::Unknown);
        assert_eq!(node_color("SPACESHIP"), DEFAULT_COLOR);
        assert_eq!(node_color(""), DEFAULT_COLOR);
    }

    #[test]
    fn test_edge_color_fallback() {
        assert_eq!(edge_color("is a customer of"), "#4CAF50");
        assert_eq!(edge_color("is married to"), DEFAULT_COLOR);
    }

    #[test]
    fn test_legend_dedupes_and_skips_empty_edge_labels() {
        let store = GraphStore::normalize(RawGraph {
            nodes: vec![
                RawNode::new("a", "A", "PERSON"),
                RawNode::new("b", "B", "PERSON"),
                RawNode::new("c", "C", "COMPANY"),
            ],
            edges: vec![
                RawEdge::new("r1", "a", "b", "is a director of"),
                RawEdge::new("r2", "b", "c", ""),
            ],
        });
        let view = store.denormalize(&Default::default());
        let legend = legend(&view);

        assert_eq!(legend.node_labels.len(), 2);
        assert_eq!(legend.edge_labels.len(), 1);
        assert_eq!(legend.edge_labels[0].label, "is a director of");
    }
}
