//! Entity records for the exploration graph
//!
//! An entity is a vertex extracted by the backend pipeline: a person,
//! organization, location and so on. Records are built from loosely-typed
//! input with silent defaulting; the store never rejects a malformed node.

use super::property::PropertyMap;
use super::types::EntityId;
use serde::{Deserialize, Serialize};

/// A loosely-typed entity as received from the backend or an accumulated
/// in-memory graph. Every field but the id may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default)]
    pub relationship_count: u32,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default)]
    pub needs_full_details: bool,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl RawNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, label: impl Into<String>) -> Self {
        RawNode {
            id: id.into(),
            name: name.into(),
            label: label.into(),
            ..RawNode::default()
        }
    }
}

/// A materialized entity record
///
/// `relationship_count` may be a server-reported total even before the
/// edges themselves are held locally. `is_expanded` flips once the full
/// relationship set has been fetched and merged; `needs_full_details`
/// marks entities discovered only as endpoints of a fetched relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub label: String,
    pub properties: PropertyMap,
    pub relationship_count: u32,
    pub is_expanded: bool,
    pub needs_full_details: bool,

    /// Insertion timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Entity {
    /// Build an entity from loose input, defaulting absent fields
    pub fn from_raw(raw: RawNode, now: i64) -> Self {
        Entity {
            id: EntityId::new(raw.id),
            name: raw.name,
            label: raw.label,
            properties: raw.properties,
            relationship_count: raw.relationship_count,
            is_expanded: raw.is_expanded,
            needs_full_details: raw.needs_full_details,
            created_at: raw.created_at.unwrap_or(now),
            updated_at: now,
        }
    }

    /// Case-insensitive substring match against name and label
    pub fn matches_search(&self, lowercase_term: &str) -> bool {
        self.name.to_lowercase().contains(lowercase_term)
            || self.label.to_lowercase().contains(lowercase_term)
    }

    /// Merge a partial update into this record, bumping `updated_at`
    pub fn apply(&mut self, patch: EntityPatch, now: i64) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(properties) = patch.properties {
            self.properties = properties;
        }
        if let Some(count) = patch.relationship_count {
            self.relationship_count = count;
        }
        if let Some(expanded) = patch.is_expanded {
            self.is_expanded = expanded;
        }
        if let Some(needs) = patch.needs_full_details {
            self.needs_full_details = needs;
        }
        self.updated_at = now;
    }
}

/// Field-wise partial update for an entity; absent fields are untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub properties: Option<PropertyMap>,
    pub relationship_count: Option<u32>,
    pub is_expanded: Option<bool>,
    pub needs_full_details: Option<bool>,
}

impl EntityPatch {
    /// Patch marking an entity expanded with its fetched relationship total
    pub fn expanded(relationship_count: u32) -> Self {
        EntityPatch {
            is_expanded: Some(true),
            relationship_count: Some(relationship_count),
            ..EntityPatch::default()
        }
    }

    /// Patch filling in fetched full details for a stub endpoint entity
    pub fn full_details(properties: PropertyMap, relationship_count: u32) -> Self {
        EntityPatch {
            properties: Some(properties),
            relationship_count: Some(relationship_count),
            needs_full_details: Some(false),
            ..EntityPatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_defaults() {
        let raw: RawNode = serde_json::from_str(r#"{"id": "e-1"}"#).unwrap();
        let entity = Entity::from_raw(raw, 1_000);

        assert_eq!(entity.id.as_str(), "e-1");
        assert_eq!(entity.name, "");
        assert_eq!(entity.label, "");
        assert!(entity.properties.is_empty());
        assert_eq!(entity.relationship_count, 0);
        assert!(!entity.is_expanded);
        assert!(!entity.needs_full_details);
        assert_eq!(entity.created_at, 1_000);
    }

    #[test]
    fn test_from_raw_keeps_supplied_created_at() {
        let mut raw = RawNode::new("e-1", "Acme", "COMPANY");
        raw.created_at = Some(500);
        let entity = Entity::from_raw(raw, 1_000);
        assert_eq!(entity.created_at, 500);
        assert_eq!(entity.updated_at, 1_000);
    }

    #[test]
    fn test_matches_search() {
        let entity = Entity::from_raw(RawNode::new("e-1", "Acme Corp", "COMPANY"), 0);

        assert!(entity.matches_search("acme"));
        assert!(entity.matches_search("corp"));
        assert!(entity.matches_search("company"));
        assert!(!entity.matches_search("acmee"));
    }

    #[test]
    fn test_apply_patch() {
        let mut entity = Entity::from_raw(RawNode::new("e-1", "Acme", "COMPANY"), 0);

        entity.apply(EntityPatch::expanded(7), 50);
        assert!(entity.is_expanded);
        assert_eq!(entity.relationship_count, 7);
        assert_eq!(entity.updated_at, 50);
        // Untouched fields survive
        assert_eq!(entity.name, "Acme");

        let mut props = PropertyMap::new();
        props.insert("sector".to_string(), "industrial".into());
        entity.apply(EntityPatch::full_details(props, 9), 60);
        assert_eq!(entity.relationship_count, 9);
        assert!(!entity.needs_full_details);
        assert_eq!(
            entity.properties.get("sector").unwrap().as_string(),
            Some("industrial")
        );
    }
}
