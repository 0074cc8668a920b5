//! Relationship records for the exploration graph
//!
//! A relationship is a directed, typed edge between two entities. The
//! store does not enforce referential integrity at insert time: an edge
//! may reference entities that are not (yet) materialized, and such
//! dangling edges are dropped at projection time instead.

use super::property::PropertyMap;
use super::types::{EntityId, RelationshipId};
use serde::{Deserialize, Serialize};

/// A loosely-typed relationship as received from the backend. The label
/// may be empty; absent fields default silently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl RawEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        RawEdge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: label.into(),
            ..RawEdge::default()
        }
    }
}

/// A materialized relationship record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source_id: EntityId,
    pub target_id: EntityId,
    pub label: String,
    pub properties: PropertyMap,

    /// Insertion timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Relationship {
    /// Build a relationship from loose input, defaulting absent fields
    pub fn from_raw(raw: RawEdge, now: i64) -> Self {
        Relationship {
            id: RelationshipId::new(raw.id),
            source_id: EntityId::new(raw.source),
            target_id: EntityId::new(raw.target),
            label: raw.label,
            properties: raw.properties,
            created_at: raw.created_at.unwrap_or(now),
            updated_at: now,
        }
    }

    /// True if the given entity is either endpoint
    pub fn is_incident_to(&self, entity_id: &EntityId) -> bool {
        &self.source_id == entity_id || &self.target_id == entity_id
    }

    /// The opposite endpoint, if the given entity is one of the two
    pub fn other_endpoint(&self, entity_id: &EntityId) -> Option<&EntityId> {
        if &self.source_id == entity_id {
            Some(&self.target_id)
        } else if &self.target_id == entity_id {
            Some(&self.source_id)
        } else {
            None
        }
    }
}
