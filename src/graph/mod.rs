//! Normalized graph model for the exploration session
//!
//! This module implements the session's single source of truth:
//! - Entities with open property maps and expansion state
//! - Directed, typed relationships with tolerated dangling endpoints
//! - An id-keyed store with an incident-relationship index
//! - Filtered projection back to a node/edge list for rendering

pub mod entity;
pub mod filter;
pub mod property;
pub mod relationship;
pub mod store;
pub mod types;

// Re-export main types
pub use entity::{Entity, EntityPatch, RawNode};
pub use filter::{ConnectionRange, DisplayOptions, GraphFilter, TypeFilter};
pub use property::{PropertyMap, PropertyValue};
pub use relationship::{RawEdge, Relationship};
pub use store::{
    EntityCriteria, GraphStats, GraphStore, GraphView, RawGraph, RelationshipCriteria,
};
pub use types::{EntityId, RelationshipId};

/// Current wall-clock time in Unix milliseconds, used for record stamps
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
