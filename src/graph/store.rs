//! Normalized in-memory store for the graph exploration session
//!
//! Single source of truth for every entity and relationship known to the
//! session. Uses id-keyed maps for O(1) lookup:
//! - entities: EntityId -> Entity
//! - relationships: RelationshipId -> Relationship
//! - incident: EntityId -> set of incident relationship ids
//!
//! All operations are total functions over their inputs: unknown ids in
//! update/remove are tolerated as no-ops, re-adding an id overwrites
//! (last-write-wins), and referential integrity is enforced only at
//! projection time. Callers rely on these silent semantics.

use super::entity::{Entity, EntityPatch, RawNode};
use super::filter::GraphFilter;
use super::now_millis;
use super::property::PropertyMap;
use super::relationship::{RawEdge, Relationship};
use super::types::{EntityId, RelationshipId};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A loosely-typed node/edge list, as returned by the backend or
/// accumulated in memory. Either list may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGraph {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

/// A filtered projection of the store, ready for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<Entity>,
    pub edges: Vec<Relationship>,
}

/// Derived store statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub entity_count: usize,
    pub relationship_count: usize,
    pub avg_relationships_per_entity: f64,
}

/// Predicate query over entities
#[derive(Debug, Clone, Default)]
pub struct EntityCriteria {
    pub label: Option<String>,
    /// Case-insensitive substring match against the name
    pub name_contains: Option<String>,
    pub is_expanded: Option<bool>,
    /// Require at least one property to be present
    pub has_properties: bool,
}

/// Predicate query over relationships
#[derive(Debug, Clone, Default)]
pub struct RelationshipCriteria {
    pub label: Option<String>,
    pub source_id: Option<EntityId>,
    pub target_id: Option<EntityId>,
}

/// Normalized graph store
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Entity storage, insertion-ordered for deterministic projection
    entities: IndexMap<EntityId, Entity>,

    /// Relationship storage, insertion-ordered
    relationships: IndexMap<RelationshipId, Relationship>,

    /// Incident-relationship index. Maintained for every endpoint id seen
    /// on a relationship, whether or not that entity is materialized yet,
    /// so removal cascades hold regardless of arrival order.
    incident: HashMap<EntityId, IndexSet<RelationshipId>>,
}

impl GraphStore {
    /// Create a new empty store
    pub fn new() -> Self {
        GraphStore::default()
    }

    /// Build a store from a loose node/edge list, defaulting absent
    /// fields. Malformed input is never rejected.
    pub fn normalize(raw: RawGraph) -> Self {
        let mut store = GraphStore::new();
        store.add_entities(raw.nodes);
        store.add_relationships(raw.edges);
        store
    }

    // ============================================================
    // Mutation
    // ============================================================

    /// Upsert entities by id (last-write-wins), initializing incident
    /// tracking for newly seen ids
    pub fn add_entities(&mut self, nodes: Vec<RawNode>) {
        let now = now_millis();
        for raw in nodes {
            let entity = Entity::from_raw(raw, now);
            self.incident.entry(entity.id.clone()).or_default();
            self.entities.insert(entity.id.clone(), entity);
        }
    }

    /// Upsert relationships by id, tracking incidence for both endpoints
    pub fn add_relationships(&mut self, edges: Vec<RawEdge>) {
        let now = now_millis();
        for raw in edges {
            let rel = Relationship::from_raw(raw, now);
            self.incident
                .entry(rel.source_id.clone())
                .or_default()
                .insert(rel.id.clone());
            self.incident
                .entry(rel.target_id.clone())
                .or_default()
                .insert(rel.id.clone());
            self.relationships.insert(rel.id.clone(), rel);
        }
    }

    /// Merge a partial update into an existing entity; no-op if absent
    pub fn update_entity(&mut self, id: &str, patch: EntityPatch) {
        if let Some(entity) = self.entities.get_mut(id) {
            entity.apply(patch, now_millis());
        }
    }

    /// Delete entities together with every relationship incident to them,
    /// purging dangling references from other entities' incident sets.
    /// Unknown ids are no-ops.
    pub fn remove_entities(&mut self, ids: &[EntityId]) {
        for id in ids {
            let incident = self.incident.remove(id).unwrap_or_default();
            for rel_id in &incident {
                if let Some(rel) = self.relationships.shift_remove(rel_id) {
                    let other = if &rel.source_id == id {
                        rel.target_id
                    } else {
                        rel.source_id
                    };
                    if let Some(set) = self.incident.get_mut(&other) {
                        set.shift_remove(rel_id);
                    }
                }
            }
            self.entities.shift_remove(id);
        }
    }

    /// Reset the store to empty
    pub fn clear(&mut self) {
        self.entities.clear();
        self.relationships.clear();
        self.incident.clear();
    }

    // ============================================================
    // Lookup
    // ============================================================

    /// Get an entity by id
    pub fn get_entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Get a relationship by id
    pub fn get_relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    /// Check if an entity exists
    pub fn has_entity(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Check if a relationship exists
    pub fn has_relationship(&self, id: &str) -> bool {
        self.relationships.contains_key(id)
    }

    /// Materialized relationship records incident to an entity, resolved
    /// through the index
    pub fn entity_relationships(&self, id: &str) -> Vec<&Relationship> {
        self.incident
            .get(id)
            .map(|rel_ids| {
                rel_ids
                    .iter()
                    .filter_map(|rel_id| self.relationships.get(rel_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Total number of relationships
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }

    /// All entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// All relationships in insertion order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    // ============================================================
    // Queries
    // ============================================================

    /// Entities matching every populated criterion
    pub fn find_entities(&self, criteria: &EntityCriteria) -> Vec<&Entity> {
        let name_contains = criteria.name_contains.as_ref().map(|s| s.to_lowercase());
        self.entities
            .values()
            .filter(|entity| {
                if let Some(label) = &criteria.label {
                    if &entity.label != label {
                        return false;
                    }
                }
                if let Some(needle) = &name_contains {
                    if !entity.name.to_lowercase().contains(needle) {
                        return false;
                    }
                }
                if let Some(expanded) = criteria.is_expanded {
                    if entity.is_expanded != expanded {
                        return false;
                    }
                }
                if criteria.has_properties && entity.properties.is_empty() {
                    return false;
                }
                true
            })
            .collect()
    }

    /// Relationships matching every populated criterion
    pub fn find_relationships(&self, criteria: &RelationshipCriteria) -> Vec<&Relationship> {
        self.relationships
            .values()
            .filter(|rel| {
                if let Some(label) = &criteria.label {
                    if &rel.label != label {
                        return false;
                    }
                }
                if let Some(source) = &criteria.source_id {
                    if &rel.source_id != source {
                        return false;
                    }
                }
                if let Some(target) = &criteria.target_id {
                    if &rel.target_id != target {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    /// Distinct entity labels in first-seen order, for filter UI
    pub fn unique_entity_labels(&self) -> Vec<String> {
        let mut labels: IndexSet<&str> = IndexSet::new();
        for entity in self.entities.values() {
            labels.insert(entity.label.as_str());
        }
        labels.into_iter().map(String::from).collect()
    }

    /// Distinct non-empty relationship labels in first-seen order
    pub fn unique_relationship_labels(&self) -> Vec<String> {
        let mut labels: IndexSet<&str> = IndexSet::new();
        for rel in self.relationships.values() {
            if !rel.label.is_empty() {
                labels.insert(rel.label.as_str());
            }
        }
        labels.into_iter().map(String::from).collect()
    }

    /// Derived statistics
    pub fn stats(&self) -> GraphStats {
        let entity_count = self.entities.len();
        let relationship_count = self.relationships.len();
        GraphStats {
            entity_count,
            relationship_count,
            avg_relationships_per_entity: if entity_count > 0 {
                relationship_count as f64 / entity_count as f64
            } else {
                0.0
            },
        }
    }

    // ============================================================
    // Projection
    // ============================================================

    /// Project the store back to a node/edge list for rendering, honoring
    /// the filter specification. An edge survives only when both of its
    /// endpoints survive; dangling edges are dropped silently.
    pub fn denormalize(&self, filter: &GraphFilter) -> GraphView {
        let search = filter
            .search_term
            .as_deref()
            .map(str::to_lowercase)
            .filter(|term| !term.is_empty());

        let mut nodes = Vec::new();
        for entity in self.entities.values() {
            if !filter.entity_types.matches(&entity.label) {
                continue;
            }
            if let Some(term) = &search {
                if !entity.matches_search(term) {
                    continue;
                }
            }
            if let Some(range) = &filter.connection_range {
                if !range.contains(entity.relationship_count) {
                    continue;
                }
            }
            nodes.push(entity.clone());
        }

        let visible: FxHashSet<&EntityId> = nodes.iter().map(|entity| &entity.id).collect();

        let edges = self
            .relationships
            .values()
            .filter(|rel| filter.relationship_types.matches(&rel.label))
            .filter(|rel| visible.contains(&rel.source_id) && visible.contains(&rel.target_id))
            .cloned()
            .collect();

        GraphView { nodes, edges }
    }

    /// Properties of an entity, empty if the entity is unknown
    pub fn entity_properties(&self, id: &str) -> PropertyMap {
        self.entities
            .get(id)
            .map(|entity| entity.properties.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::filter::{ConnectionRange, TypeFilter};

    fn sample_graph() -> RawGraph {
        RawGraph {
            nodes: vec![
                RawNode::new("a", "Acme Corp", "COMPANY"),
                RawNode::new("b", "Jane Doe", "PERSON"),
                RawNode::new("c", "Lisbon", "LOCATION"),
            ],
            edges: vec![
                RawEdge::new("r1", "a", "b", "is a director of"),
                RawEdge::new("r2", "a", "c", "is located in"),
            ],
        }
    }

    #[test]
    fn test_normalize_and_lookup() {
        let store = GraphStore::normalize(sample_graph());

        assert_eq!(store.entity_count(), 3);
        assert_eq!(store.relationship_count(), 2);
        assert_eq!(store.get_entity("a").unwrap().name, "Acme Corp");
        assert_eq!(store.get_relationship("r1").unwrap().label, "is a director of");
        assert!(store.get_entity("missing").is_none());
    }

    #[test]
    fn test_readd_overwrites_last_write_wins() {
        let mut store = GraphStore::normalize(sample_graph());
        store.add_entities(vec![RawNode::new("a", "Acme Holdings", "ORGANIZATION")]);

        assert_eq!(store.entity_count(), 3);
        let entity = store.get_entity("a").unwrap();
        assert_eq!(entity.name, "Acme Holdings");
        assert_eq!(entity.label, "ORGANIZATION");
    }

    #[test]
    fn test_incident_index() {
        let store = GraphStore::normalize(sample_graph());

        let rels = store.entity_relationships("a");
        assert_eq!(rels.len(), 2);
        assert_eq!(store.entity_relationships("b").len(), 1);
        assert!(store.entity_relationships("missing").is_empty());
    }

    #[test]
    fn test_update_entity_merges_and_tolerates_unknown() {
        let mut store = GraphStore::normalize(sample_graph());

        store.update_entity("a", EntityPatch::expanded(4));
        let entity = store.get_entity("a").unwrap();
        assert!(entity.is_expanded);
        assert_eq!(entity.relationship_count, 4);
        assert_eq!(entity.name, "Acme Corp");

        // Unknown id is a no-op, not an error
        store.update_entity("missing", EntityPatch::expanded(1));
        assert_eq!(store.entity_count(), 3);
    }

    #[test]
    fn test_remove_entities_cascades() {
        let mut store = GraphStore::normalize(sample_graph());
        store.remove_entities(&[EntityId::new("a")]);

        assert_eq!(store.entity_count(), 2);
        assert_eq!(store.relationship_count(), 0);
        assert!(store.entity_relationships("b").is_empty());
        assert!(store.entity_relationships("c").is_empty());
    }

    #[test]
    fn test_remove_cascades_even_when_edge_arrived_first() {
        let mut store = GraphStore::new();
        store.add_relationships(vec![RawEdge::new("r1", "a", "b", "knows")]);
        store.add_entities(vec![
            RawNode::new("a", "A", "PERSON"),
            RawNode::new("b", "B", "PERSON"),
        ]);

        store.remove_entities(&[EntityId::new("a")]);
        assert_eq!(store.relationship_count(), 0);
    }

    #[test]
    fn test_denormalize_unfiltered_drops_dangling_edges() {
        let mut raw = sample_graph();
        raw.edges.push(RawEdge::new("r3", "a", "ghost", "references"));
        let store = GraphStore::normalize(raw);

        let view = store.denormalize(&GraphFilter::none());
        assert_eq!(view.nodes.len(), 3);
        assert_eq!(view.edges.len(), 2);
        assert!(view.edges.iter().all(|rel| rel.id.as_str() != "r3"));
    }

    #[test]
    fn test_denormalize_entity_type_filter() {
        let store = GraphStore::normalize(sample_graph());

        let mut filter = GraphFilter::none();
        filter.entity_types = TypeFilter::show_only(["COMPANY", "PERSON"]);
        let view = store.denormalize(&filter);
        assert_eq!(view.nodes.len(), 2);
        // The a->c edge loses its endpoint and disappears
        assert_eq!(view.edges.len(), 1);
        assert_eq!(view.edges[0].id.as_str(), "r1");

        filter.entity_types = TypeFilter::ShowNone;
        let view = store.denormalize(&filter);
        assert!(view.nodes.is_empty());
        assert!(view.edges.is_empty());
    }

    #[test]
    fn test_denormalize_relationship_type_filter() {
        let store = GraphStore::normalize(sample_graph());

        let mut filter = GraphFilter::none();
        filter.relationship_types = TypeFilter::show_only(["is a director of"]);
        let view = store.denormalize(&filter);
        assert_eq!(view.nodes.len(), 3);
        assert_eq!(view.edges.len(), 1);
    }

    #[test]
    fn test_denormalize_search_filter() {
        let store = GraphStore::normalize(sample_graph());

        let mut filter = GraphFilter::none();
        filter.search_term = Some("ACME".to_string());
        let view = store.denormalize(&filter);
        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.nodes[0].id.as_str(), "a");

        // Matches against the label too
        filter.search_term = Some("person".to_string());
        let view = store.denormalize(&filter);
        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.nodes[0].id.as_str(), "b");
    }

    #[test]
    fn test_denormalize_connection_range() {
        let mut store = GraphStore::normalize(sample_graph());
        store.update_entity(
            "a",
            EntityPatch {
                relationship_count: Some(5),
                ..EntityPatch::default()
            },
        );

        let mut filter = GraphFilter::none();
        filter.connection_range = Some(ConnectionRange::new(5, 5));
        let view = store.denormalize(&filter);
        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.nodes[0].id.as_str(), "a");

        filter.connection_range = Some(ConnectionRange::new(6, 10));
        assert!(store.denormalize(&filter).nodes.is_empty());
    }

    #[test]
    fn test_unique_labels() {
        let mut store = GraphStore::normalize(sample_graph());
        store.add_entities(vec![RawNode::new("d", "John", "PERSON")]);

        assert_eq!(
            store.unique_entity_labels(),
            vec!["COMPANY", "PERSON", "LOCATION"]
        );
        assert_eq!(
            store.unique_relationship_labels(),
            vec!["is a director of", "is located in"]
        );
    }

    #[test]
    fn test_stats() {
        let store = GraphStore::normalize(sample_graph());
        let stats = store.stats();
        assert_eq!(stats.entity_count, 3);
        assert_eq!(stats.relationship_count, 2);
        assert!((stats.avg_relationships_per_entity - 2.0 / 3.0).abs() < f64::EPSILON);

        assert_eq!(GraphStore::new().stats().avg_relationships_per_entity, 0.0);
    }

    #[test]
    fn test_find_entities() {
        let store = GraphStore::normalize(sample_graph());

        let criteria = EntityCriteria {
            label: Some("PERSON".to_string()),
            ..EntityCriteria::default()
        };
        assert_eq!(store.find_entities(&criteria).len(), 1);

        let criteria = EntityCriteria {
            name_contains: Some("acme".to_string()),
            ..EntityCriteria::default()
        };
        assert_eq!(store.find_entities(&criteria).len(), 1);

        let criteria = EntityCriteria {
            has_properties: true,
            ..EntityCriteria::default()
        };
        assert!(store.find_entities(&criteria).is_empty());
    }

    #[test]
    fn test_find_relationships() {
        let store = GraphStore::normalize(sample_graph());

        let criteria = RelationshipCriteria {
            source_id: Some(EntityId::new("a")),
            ..RelationshipCriteria::default()
        };
        assert_eq!(store.find_relationships(&criteria).len(), 2);

        let criteria = RelationshipCriteria {
            target_id: Some(EntityId::new("c")),
            label: Some("is located in".to_string()),
            ..RelationshipCriteria::default()
        };
        assert_eq!(store.find_relationships(&criteria).len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = GraphStore::normalize(sample_graph());
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.entity_count(), 0);
        assert_eq!(store.relationship_count(), 0);
        assert!(store.entity_relationships("a").is_empty());
    }
}
