//! Core identifier types for the exploration graph
//!
//! Entity and relationship ids are assigned by the backend and treated as
//! opaque strings; they are globally unique within one store.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for an entity (graph vertex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId(id.to_string())
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a relationship (directed edge)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RelationshipId(String);

impl RelationshipId {
    pub fn new(id: impl Into<String>) -> Self {
        RelationshipId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RelationshipId {
    fn from(id: String) -> Self {
        RelationshipId(id)
    }
}

impl From<&str> for RelationshipId {
    fn from(id: &str) -> Self {
        RelationshipId(id.to_string())
    }
}

impl Borrow<str> for RelationshipId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id() {
        let id = EntityId::new("e-42");
        assert_eq!(id.as_str(), "e-42");
        assert_eq!(format!("{}", id), "e-42");

        let id2: EntityId = "e-100".into();
        assert_eq!(id2.as_str(), "e-100");
    }

    #[test]
    fn test_relationship_id() {
        let id = RelationshipId::new("r-99");
        assert_eq!(id.as_str(), "r-99");
        assert_eq!(format!("{}", id), "r-99");
    }

    #[test]
    fn test_id_ordering() {
        let id1 = EntityId::new("a");
        let id2 = EntityId::new("b");
        assert!(id1 < id2);
    }

    #[test]
    fn test_serde_transparent() {
        let id = EntityId::new("e-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"e-1\"");
        let back: EntityId = serde_json::from_str("\"e-1\"").unwrap();
        assert_eq!(back, id);
    }
}
