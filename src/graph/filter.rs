//! Filter specification applied when projecting the store for rendering
//!
//! Type filters carry an explicit three-state semantics inherited from the
//! panel UI that produces them: an unset filter shows everything, an empty
//! selection shows nothing, and a populated selection shows exactly the
//! listed labels. The middle state is a deliberate convention, so it is a
//! named variant here rather than an empty-collection special case.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Visibility filter over a label vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeFilter {
    /// No filter installed: every label passes
    #[default]
    Unfiltered,
    /// Explicit empty selection: no label passes
    ShowNone,
    /// Only the listed labels pass
    ShowOnly(HashSet<String>),
}

impl TypeFilter {
    /// Build from an optional selection list, mapping an empty list to
    /// `ShowNone` and an absent one to `Unfiltered`.
    pub fn from_selection(selection: Option<Vec<String>>) -> Self {
        match selection {
            None => TypeFilter::Unfiltered,
            Some(labels) => TypeFilter::show_only(labels),
        }
    }

    /// Build a `ShowOnly` filter; an empty iterator yields `ShowNone`
    pub fn show_only<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = labels.into_iter().map(Into::into).collect();
        if set.is_empty() {
            TypeFilter::ShowNone
        } else {
            TypeFilter::ShowOnly(set)
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            TypeFilter::Unfiltered => true,
            TypeFilter::ShowNone => false,
            TypeFilter::ShowOnly(set) => set.contains(label),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        matches!(self, TypeFilter::Unfiltered)
    }
}

/// Inclusive bounds on an entity's relationship count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRange {
    pub min: u32,
    pub max: u32,
}

impl ConnectionRange {
    pub fn new(min: u32, max: u32) -> Self {
        ConnectionRange { min, max }
    }

    pub fn contains(&self, count: u32) -> bool {
        count >= self.min && count <= self.max
    }
}

/// The complete filter specification consumed by projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphFilter {
    pub entity_types: TypeFilter,
    pub relationship_types: TypeFilter,
    /// Case-insensitive substring match against entity name and label
    pub search_term: Option<String>,
    pub connection_range: Option<ConnectionRange>,
}

impl GraphFilter {
    /// A filter that passes everything through
    pub fn none() -> Self {
        GraphFilter::default()
    }
}

/// Label-visibility toggles consumed by the canvas, not by projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub show_node_labels: bool,
    pub show_edge_labels: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            show_node_labels: true,
            show_edge_labels: true,
        }
    }
}
