//! Session controller behavior: batching, expansion guards, staleness

use nexus::api::{EntityDetails, ExpandResponse, RelationshipEndpoint, SearchHit, WireRelationship};
use nexus::graph::{PropertyMap, RawNode};
use nexus::session::{AddOutcome, GraphOp, GraphSession, MergeOutcome};

fn hit(id: &str, name: &str) -> SearchHit {
    serde_json::from_value(serde_json::json!({
        "ID": id, "NAME": name, "LABEL": "COMPANY", "EDGES": [{}]
    }))
    .unwrap()
}

fn endpoint(id: &str, name: &str, label: &str) -> RelationshipEndpoint {
    RelationshipEndpoint {
        id: id.to_string(),
        name: name.to_string(),
        label: label.to_string(),
        properties: PropertyMap::new(),
    }
}

fn expansion_of(entity_id: &str, neighbors: &[(&str, &str)]) -> ExpandResponse {
    ExpandResponse {
        entity: EntityDetails {
            id: entity_id.to_string(),
            name: entity_id.to_string(),
            label: "COMPANY".to_string(),
            properties: PropertyMap::new(),
            relationship_count: neighbors.len() as u32,
        },
        relationships: neighbors
            .iter()
            .enumerate()
            .map(|(i, &(id, name))| WireRelationship {
                id: format!("{}-{}", entity_id, i),
                label: "is a supplier/partner of".to_string(),
                properties: PropertyMap::new(),
                source: endpoint(entity_id, entity_id, "COMPANY"),
                target: endpoint(id, name, "COMPANY"),
            })
            .collect(),
    }
}

#[test]
fn expansion_commits_as_one_revision() {
    let mut session = GraphSession::new();
    session.add_entity_from_search(&hit("acme", "Acme Corp"));

    let epoch = session.begin_expansion("acme").unwrap();
    let revision = session.revision();
    let outcome = session.merge_expansion(
        "acme",
        &expansion_of("acme", &[("globex", "Globex"), ("initech", "Initech")]),
        epoch,
    );

    assert_eq!(
        outcome,
        MergeOutcome::Merged {
            new_entities: 2,
            new_relationships: 2
        }
    );
    // The whole merge is a single state transition
    assert_eq!(session.revision(), revision + 1);
    assert_eq!(session.stats().entity_count, 3);
    assert_eq!(session.stats().relationship_count, 2);
}

#[test]
fn concurrent_expansion_of_distinct_nodes_is_allowed() {
    let mut session = GraphSession::new();
    session.batch_update(vec![GraphOp::AddEntities(vec![
        RawNode::new("a", "A", "COMPANY"),
        RawNode::new("b", "B", "COMPANY"),
    ])]);

    let epoch_a = session.begin_expansion("a").unwrap();
    let epoch_b = session.begin_expansion("b").unwrap();
    assert!(session.begin_expansion("a").is_none());
    assert!(session.begin_expansion("b").is_none());

    // Responses may land in any order
    session.merge_expansion("b", &expansion_of("b", &[("n1", "N1")]), epoch_b);
    session.finish_expansion("b");
    session.merge_expansion("a", &expansion_of("a", &[("n2", "N2")]), epoch_a);
    session.finish_expansion("a");

    assert!(session.store().get_entity("a").unwrap().is_expanded);
    assert!(session.store().get_entity("b").unwrap().is_expanded);
    assert_eq!(session.stats().entity_count, 4);
}

#[test]
fn responses_started_before_clear_are_discarded() {
    let mut session = GraphSession::new();
    session.add_entity_from_search(&hit("acme", "Acme Corp"));

    let epoch = session.begin_expansion("acme").unwrap();

    // User clears the graph while the fetch is in flight
    session.clear_graph();
    session.add_entity_from_search(&hit("fresh", "Fresh Start"));

    let outcome = session.merge_expansion("acme", &expansion_of("acme", &[("x", "X")]), epoch);
    session.finish_expansion("acme");

    assert_eq!(outcome, MergeOutcome::Stale);
    // The post-clear graph is untouched by the stale merge
    assert_eq!(session.stats().entity_count, 1);
    assert!(session.store().get_entity("fresh").is_some());
    assert!(session.store().get_entity("acme").is_none());
}

#[test]
fn details_fetch_fills_stub_entities() {
    let mut session = GraphSession::new();
    session.add_entity_from_search(&hit("acme", "Acme Corp"));

    let epoch = session.begin_expansion("acme").unwrap();
    session.merge_expansion("acme", &expansion_of("acme", &[("globex", "Globex")]), epoch);
    session.finish_expansion("acme");

    // The endpoint arrived as a stub
    assert!(session.needs_full_details("globex"));

    let mut properties = PropertyMap::new();
    properties.insert("sector".to_string(), "manufacturing".into());
    let details = EntityDetails {
        id: "globex".to_string(),
        name: "Globex".to_string(),
        label: "COMPANY".to_string(),
        properties,
        relationship_count: 4,
    };
    session.merge_full_details("globex", &details, session.epoch());

    assert!(!session.needs_full_details("globex"));
    let entity = session.store().get_entity("globex").unwrap();
    assert_eq!(entity.relationship_count, 4);
    assert!(!entity.properties.is_empty());
}

#[test]
fn duplicate_search_adds_are_reported_not_errored() {
    let mut session = GraphSession::new();

    assert_eq!(
        session.add_entity_from_search(&hit("acme", "Acme Corp")),
        AddOutcome::Added
    );
    assert_eq!(
        session.add_entity_from_search(&hit("acme", "Acme Corp")),
        AddOutcome::AlreadyPresent
    );
    assert_eq!(session.stats().entity_count, 1);
}

#[test]
fn stats_track_unique_label_sets() {
    let mut session = GraphSession::new();
    session.batch_update(vec![GraphOp::AddEntities(vec![
        RawNode::new("a", "A", "COMPANY"),
        RawNode::new("b", "B", "COMPANY"),
        RawNode::new("c", "C", "PERSON"),
    ])]);

    let stats = session.stats();
    assert_eq!(stats.entity_count, 3);
    assert_eq!(stats.unique_entity_labels, 2);
    assert_eq!(stats.avg_relationships_per_entity, 0.0);
}
