//! Wire types for the relationships backend
//!
//! The backend is an external REST contract; these shapes mirror what it
//! actually returns. Search hits arrive with upper-case field names, the
//! expansion envelope with lower-case ones. Optional fields default
//! silently, consistent with the store's tolerance for partial input.

use crate::graph::PropertyMap;
use serde::{Deserialize, Serialize};

/// One entity hit from `GET /relationships?search={term}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "LABEL", default)]
    pub label: String,
    #[serde(rename = "PROPERTIES", default)]
    pub properties: PropertyMap,
    /// Known edges at search time; only the count is consumed
    #[serde(rename = "EDGES", default)]
    pub edges: Vec<serde_json::Value>,
}

impl SearchHit {
    /// Server-known relationship total for this hit
    pub fn relationship_count(&self) -> u32 {
        self.edges.len() as u32
    }
}

/// The entity envelope from `GET /relationships?entity_id={id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDetails {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default)]
    pub relationship_count: u32,
}

/// One endpoint of a fetched relationship. Properties are typically
/// absent here; such entities are merged as stubs needing full details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipEndpoint {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// A relationship with both endpoints inlined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRelationship {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
    pub source: RelationshipEndpoint,
    pub target: RelationshipEndpoint,
}

/// Full expansion response for one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandResponse {
    pub entity: EntityDetails,
    #[serde(default)]
    pub relationships: Vec<WireRelationship>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_hit_decodes_upper_case_fields() {
        let json = r#"{"ID": "e-1", "NAME": "Acme Corp", "LABEL": "COMPANY", "EDGES": [{}, {}]}"#;
        let hit: SearchHit = serde_json::from_str(json).unwrap();

        assert_eq!(hit.id, "e-1");
        assert_eq!(hit.name, "Acme Corp");
        assert_eq!(hit.label, "COMPANY");
        assert_eq!(hit.relationship_count(), 2);
        assert!(hit.properties.is_empty());
    }

    #[test]
    fn test_expand_response_decodes() {
        let json = r#"{
            "entity": {"id": "e-1", "name": "Acme Corp", "label": "COMPANY", "relationship_count": 1},
            "relationships": [{
                "id": "r-1",
                "label": "is a director of",
                "source": {"id": "e-2", "name": "Jane Doe", "label": "PERSON"},
                "target": {"id": "e-1", "name": "Acme Corp", "label": "COMPANY"}
            }]
        }"#;
        let response: ExpandResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.entity.relationship_count, 1);
        assert_eq!(response.relationships.len(), 1);
        assert_eq!(response.relationships[0].source.id, "e-2");
        assert!(response.relationships[0].properties.is_empty());
    }

    #[test]
    fn test_expand_response_tolerates_missing_relationships() {
        let json = r#"{"entity": {"id": "e-1", "name": "Acme Corp"}}"#;
        let response: ExpandResponse = serde_json::from_str(json).unwrap();
        assert!(response.relationships.is_empty());
        assert_eq!(response.entity.relationship_count, 0);
    }
}
