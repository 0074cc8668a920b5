//! Tagged store operations for batched updates

use crate::graph::{EntityId, EntityPatch, GraphStore, RawEdge, RawNode};

/// One store mutation. Batching several of these commits them as a single
/// state transition, so a compound action (expand: mark the node, add its
/// neighbors, add its relationships) publishes one snapshot instead of
/// flickering through intermediates.
#[derive(Debug, Clone)]
pub enum GraphOp {
    AddEntities(Vec<RawNode>),
    AddRelationships(Vec<RawEdge>),
    UpdateEntity { id: EntityId, patch: EntityPatch },
    RemoveEntities(Vec<EntityId>),
}

impl GraphOp {
    /// Apply this operation against the store
    pub fn apply_to(self, store: &mut GraphStore) {
        match self {
            GraphOp::AddEntities(nodes) => store.add_entities(nodes),
            GraphOp::AddRelationships(edges) => store.add_relationships(edges),
            GraphOp::UpdateEntity { id, patch } => store.update_entity(id.as_str(), patch),
            GraphOp::RemoveEntities(ids) => store.remove_entities(&ids),
        }
    }
}
