//! Graph exploration session controller
//!
//! Owns the normalized store plus the mutable state a consuming view
//! needs: the active filter, the current selection, per-entity expansion
//! tracking and the added-entity list. The session is the sole mutator of
//! the store; every mutating call bumps the revision counter exactly
//! once, so a consumer re-projects and re-renders once per transition.
//!
//! Network I/O never happens here: the calling layer fetches and feeds
//! results back in through the merge operations.

use super::ops::GraphOp;
use crate::api::{EntityDetails, ExpandResponse, SearchHit};
use crate::graph::{
    DisplayOptions, Entity, EntityId, EntityPatch, GraphFilter, GraphStore, GraphView, RawEdge,
    RawGraph, RawNode, RelationshipId,
};
use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::debug;

/// The at-most-one selected element of the session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Entity(EntityId),
    Relationship(RelationshipId),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn entity_id(&self) -> Option<&EntityId> {
        match self {
            Selection::Entity(id) => Some(id),
            _ => None,
        }
    }
}

/// Result of adding a search hit to the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Result of merging an async response into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Merged; counts what the expansion added
    Merged {
        new_entities: usize,
        new_relationships: usize,
    },
    /// The response predates the last clear and was discarded
    Stale,
}

/// Derived read-only statistics for UI consumption
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub entity_count: usize,
    pub relationship_count: usize,
    pub avg_relationships_per_entity: f64,
    pub unique_entity_labels: usize,
    pub unique_relationship_labels: usize,
}

/// Stateful wrapper around the normalized store
#[derive(Debug, Default)]
pub struct GraphSession {
    store: GraphStore,
    filter: GraphFilter,
    display: DisplayOptions,
    selection: Selection,

    /// Entity ids with an expansion request in flight. One expansion per
    /// id at a time; distinct ids may expand concurrently.
    expanding: HashSet<EntityId>,

    /// Ids explicitly added from search results, in order
    added: IndexSet<EntityId>,

    /// Bumped once per mutating call
    revision: u64,

    /// Bumped on clear; async results from an older epoch are discarded
    epoch: u64,
}

impl GraphSession {
    /// Create an empty session
    pub fn new() -> Self {
        GraphSession::default()
    }

    /// Create a session seeded with an existing graph
    pub fn with_graph(raw: RawGraph) -> Self {
        GraphSession {
            store: GraphStore::normalize(raw),
            ..GraphSession::default()
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ============================================================
    // Store access and projection
    // ============================================================

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Monotonic state-transition counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Generation counter for stale-response detection
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Project the store through the active filter
    pub fn filtered_view(&self) -> GraphView {
        self.store.denormalize(&self.filter)
    }

    pub fn stats(&self) -> SessionStats {
        let stats = self.store.stats();
        SessionStats {
            entity_count: stats.entity_count,
            relationship_count: stats.relationship_count,
            avg_relationships_per_entity: stats.avg_relationships_per_entity,
            unique_entity_labels: self.store.unique_entity_labels().len(),
            unique_relationship_labels: self.store.unique_relationship_labels().len(),
        }
    }

    /// Distinct entity labels, for building the filter panel
    pub fn entity_labels(&self) -> Vec<String> {
        self.store.unique_entity_labels()
    }

    /// Distinct relationship labels, for building the filter panel
    pub fn relationship_labels(&self) -> Vec<String> {
        self.store.unique_relationship_labels()
    }

    // ============================================================
    // Filters and display
    // ============================================================

    pub fn filter(&self) -> &GraphFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: GraphFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.touch();
        }
    }

    pub fn set_search_term(&mut self, term: Option<String>) {
        let term = term.filter(|t| !t.trim().is_empty());
        if self.filter.search_term != term {
            self.filter.search_term = term;
            self.touch();
        }
    }

    pub fn display_options(&self) -> DisplayOptions {
        self.display
    }

    pub fn set_display_options(&mut self, display: DisplayOptions) {
        if self.display != display {
            self.display = display;
            self.touch();
        }
    }

    // ============================================================
    // Mutation
    // ============================================================

    /// Apply an ordered batch of operations as one state transition
    pub fn batch_update(&mut self, ops: Vec<GraphOp>) {
        for op in ops {
            op.apply_to(&mut self.store);
        }
        self.touch();
    }

    /// Add a search hit to the graph, skipping ids already added
    pub fn add_entity_from_search(&mut self, hit: &SearchHit) -> AddOutcome {
        let id = EntityId::new(hit.id.clone());
        if self.added.contains(&id) {
            return AddOutcome::AlreadyPresent;
        }
        if !self.store.has_entity(id.as_str()) {
            self.store.add_entities(vec![node_from_search(hit)]);
        }
        self.added.insert(id);
        self.touch();
        AddOutcome::Added
    }

    /// Ids added from search, in insertion order
    pub fn added_entity_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.added.iter()
    }

    /// Remove entities (and their incident relationships) from the graph
    pub fn remove_entities(&mut self, ids: &[EntityId]) {
        self.store.remove_entities(ids);
        for id in ids {
            self.added.shift_remove(id);
            if self.selection.entity_id() == Some(id) {
                self.selection = Selection::None;
            }
        }
        self.touch();
    }

    /// Reset the session: empty store, no selection, default filter.
    /// Bumps the epoch so in-flight responses are discarded on arrival.
    pub fn clear_graph(&mut self) {
        self.store.clear();
        self.selection = Selection::None;
        self.filter = GraphFilter::default();
        self.added.clear();
        self.epoch += 1;
        self.touch();
    }

    // ============================================================
    // Expansion flow
    // ============================================================

    /// Mark an expansion in flight for the entity. Returns the epoch to
    /// hand back to the merge call, or None if this id is already
    /// expanding (the duplicate request must not be issued).
    pub fn begin_expansion(&mut self, id: &str) -> Option<u64> {
        if !self.expanding.insert(EntityId::new(id)) {
            return None;
        }
        self.touch();
        Some(self.epoch)
    }

    /// Clear the in-flight marker, whether the request succeeded or not
    pub fn finish_expansion(&mut self, id: &str) {
        if self.expanding.remove(id) {
            self.touch();
        }
    }

    pub fn is_expanding(&self, id: &str) -> bool {
        self.expanding.contains(id)
    }

    /// Merge an expansion response fetched under `started_epoch` as one
    /// transition: mark the entity expanded, add endpoint entities not
    /// yet present (as stubs needing full details) and add the
    /// relationships.
    pub fn merge_expansion(
        &mut self,
        entity_id: &str,
        response: &ExpandResponse,
        started_epoch: u64,
    ) -> MergeOutcome {
        if started_epoch != self.epoch {
            debug!(entity_id, started_epoch, epoch = self.epoch, "discarding stale expansion");
            return MergeOutcome::Stale;
        }

        let mut new_entities: Vec<RawNode> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut new_relationships: Vec<RawEdge> = Vec::new();

        for rel in &response.relationships {
            for endpoint in [&rel.source, &rel.target] {
                if !self.store.has_entity(&endpoint.id) && seen.insert(endpoint.id.as_str()) {
                    new_entities.push(node_from_endpoint(endpoint));
                }
            }
            let mut edge = RawEdge::new(
                rel.id.clone(),
                rel.source.id.clone(),
                rel.target.id.clone(),
                rel.label.clone(),
            );
            edge.properties = rel.properties.clone();
            new_relationships.push(edge);
        }

        let entity_count = new_entities.len();
        let relationship_count = new_relationships.len();

        let mut ops = vec![GraphOp::UpdateEntity {
            id: EntityId::new(entity_id),
            patch: EntityPatch::expanded(response.relationships.len() as u32),
        }];
        if !new_entities.is_empty() {
            ops.push(GraphOp::AddEntities(new_entities));
        }
        if !new_relationships.is_empty() {
            ops.push(GraphOp::AddRelationships(new_relationships));
        }
        self.batch_update(ops);

        MergeOutcome::Merged {
            new_entities: entity_count,
            new_relationships: relationship_count,
        }
    }

    /// True when the entity was discovered as a relationship endpoint and
    /// its own properties have not been fetched yet
    pub fn needs_full_details(&self, id: &str) -> bool {
        self.store
            .get_entity(id)
            .map(|entity| entity.needs_full_details && entity.properties.is_empty())
            .unwrap_or(false)
    }

    /// Fill in fetched full details for a stub entity
    pub fn merge_full_details(
        &mut self,
        entity_id: &str,
        details: &EntityDetails,
        started_epoch: u64,
    ) -> MergeOutcome {
        if started_epoch != self.epoch {
            debug!(entity_id, "discarding stale entity details");
            return MergeOutcome::Stale;
        }

        // A zero count from the details fetch keeps whatever the session
        // already knows
        let count = if details.relationship_count > 0 {
            Some(details.relationship_count)
        } else {
            None
        };
        self.store.update_entity(
            entity_id,
            EntityPatch {
                properties: Some(details.properties.clone()),
                relationship_count: count,
                needs_full_details: Some(false),
                ..EntityPatch::default()
            },
        );
        self.touch();
        MergeOutcome::Merged {
            new_entities: 0,
            new_relationships: 0,
        }
    }

    // ============================================================
    // Selection
    // ============================================================

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_entity(&self) -> Option<&Entity> {
        self.selection
            .entity_id()
            .and_then(|id| self.store.get_entity(id.as_str()))
    }

    /// Select an entity. Returns false (and stays untouched) when the
    /// entity is unknown or already selected.
    pub fn select_entity(&mut self, id: &str) -> bool {
        if !self.store.has_entity(id) {
            return false;
        }
        let next = Selection::Entity(EntityId::new(id));
        if self.selection == next {
            return false;
        }
        self.selection = next;
        self.touch();
        true
    }

    /// Select a relationship, clearing any entity selection
    pub fn select_relationship(&mut self, id: &str) -> bool {
        if !self.store.has_relationship(id) {
            return false;
        }
        let next = Selection::Relationship(RelationshipId::new(id));
        if self.selection == next {
            return false;
        }
        self.selection = next;
        self.touch();
        true
    }

    /// Clear the selection; no-op (no revision bump) if nothing selected
    pub fn clear_selection(&mut self) -> bool {
        if self.selection.is_none() {
            return false;
        }
        self.selection = Selection::None;
        self.touch();
        true
    }
}

/// Node shape for an entity coming from a search hit
fn node_from_search(hit: &SearchHit) -> RawNode {
    let mut node = RawNode::new(hit.id.clone(), hit.name.clone(), hit.label.clone());
    node.properties = hit.properties.clone();
    node.relationship_count = hit.relationship_count();
    node
}

/// Node shape for an entity known only as a relationship endpoint: no
/// reliable count yet, flagged for a later full-detail fetch
fn node_from_endpoint(endpoint: &crate::api::RelationshipEndpoint) -> RawNode {
    let mut node = RawNode::new(
        endpoint.id.clone(),
        endpoint.name.clone(),
        endpoint.label.clone(),
    );
    node.properties = endpoint.properties.clone();
    node.needs_full_details = true;
    node
}
