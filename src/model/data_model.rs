//! The data model aggregate: nodes, relationships and their cross-entity invariants.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::node::NodeDef;
use super::properties::Metadata;
use super::relationship::{self, RelationshipDef};
use super::{Node, Relationship};
use crate::{Error, Result};

/// A property-graph data model.
///
/// Invariants, re-checked in full after every structural mutation:
///
/// 1. node labels are unique,
/// 2. relationship patterns are unique,
/// 3. every relationship endpoint names a node in the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DataModelDef")]
pub struct DataModel {
    nodes: Vec<Node>,
    relationships: Vec<Relationship>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

/// Wire shape; entities stay unvalidated so their error kinds survive.
#[derive(Debug, Deserialize)]
struct DataModelDef {
    #[serde(default)]
    nodes: Vec<NodeDef>,
    #[serde(default)]
    relationships: Vec<RelationshipDef>,
    #[serde(default)]
    metadata: Metadata,
}

impl TryFrom<DataModelDef> for DataModel {
    type Error = Error;

    fn try_from(def: DataModelDef) -> Result<Self> {
        let nodes = def
            .nodes
            .into_iter()
            .map(Node::try_from)
            .collect::<Result<Vec<_>>>()?;
        let relationships = def
            .relationships
            .into_iter()
            .map(Relationship::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(nodes, relationships)?.with_metadata(def.metadata))
    }
}

impl DataModel {
    /// Build a model and run the full validation.
    pub fn new(nodes: Vec<Node>, relationships: Vec<Relationship>) -> Result<Self> {
        let model = Self { nodes, relationships, metadata: Metadata::new() };
        model.validate()?;
        Ok(model)
    }

    /// Parse a model from its JSON form, preserving validation error kinds.
    pub fn from_json(json: &str) -> Result<Self> {
        let def: DataModelDef = serde_json::from_str(json)?;
        Self::try_from(def)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn node(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label() == label)
    }

    /// Mutable access for property edits; labels cannot change through it.
    pub fn node_mut(&mut self, label: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.label() == label)
    }

    pub fn relationship(&self, rel_type: &str, start: &str, end: &str) -> Option<&Relationship> {
        let wanted = relationship::pattern(rel_type, start, end);
        self.relationships.iter().find(|r| r.pattern() == wanted)
    }

    pub fn relationship_mut(&mut self, rel_type: &str, start: &str, end: &str) -> Option<&mut Relationship> {
        let wanted = relationship::pattern(rel_type, start, end);
        self.relationships.iter_mut().find(|r| r.pattern() == wanted)
    }

    // ========================================================================
    // Structural mutation
    // ========================================================================

    /// Append a node. A failed add leaves the model unchanged.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.node(node.label()).is_some() {
            return Err(Error::DuplicateLabel { label: node.label().to_string(), count: 2 });
        }
        debug!(label = node.label(), "adding node");
        self.nodes.push(node);
        if let Err(e) = self.validate() {
            self.nodes.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Append a relationship. A failed add leaves the model unchanged.
    pub fn add_relationship(&mut self, rel: Relationship) -> Result<()> {
        let pattern = rel.pattern();
        if self.relationships.iter().any(|r| r.pattern() == pattern) {
            return Err(Error::DuplicatePattern { pattern, count: 2 });
        }
        debug!(%pattern, "adding relationship");
        self.relationships.push(rel);
        if let Err(e) = self.validate() {
            self.relationships.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove the node with `label`, if any.
    ///
    /// Relationships are never cascaded. The removal is applied even when
    /// it orphans a relationship; that case is returned as
    /// `DanglingEndpoint` so the caller can remove or re-point it.
    pub fn remove_node(&mut self, label: &str) -> Result<()> {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.label() != label);
        if self.nodes.len() != before {
            debug!(label, "removed node");
        }
        self.validate()
    }

    /// Remove the relationship with the given pattern, if any.
    pub fn remove_relationship(&mut self, rel_type: &str, start: &str, end: &str) -> Result<()> {
        let wanted = relationship::pattern(rel_type, start, end);
        let before = self.relationships.len();
        self.relationships.retain(|r| r.pattern() != wanted);
        if self.relationships.len() != before {
            debug!(pattern = %wanted, "removed relationship");
        }
        self.validate()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check all invariants, failing fast in the order labels, patterns,
    /// endpoints, then each entity's own rules.
    pub fn validate(&self) -> Result<()> {
        if let Some((label, count)) = first_repeated(self.nodes.iter().map(|n| n.label().to_string())) {
            return Err(Error::DuplicateLabel { label, count });
        }
        if let Some((pattern, count)) = first_repeated(self.relationships.iter().map(Relationship::pattern)) {
            return Err(Error::DuplicatePattern { pattern, count });
        }
        let labels: HashSet<&str> = self.nodes.iter().map(Node::label).collect();
        for rel in &self.relationships {
            for endpoint in [rel.start_node_label(), rel.end_node_label()] {
                if !labels.contains(endpoint) {
                    return Err(Error::DanglingEndpoint {
                        pattern: rel.pattern(),
                        label: endpoint.to_string(),
                    });
                }
            }
        }
        for node in &self.nodes {
            node.validate()?;
        }
        for rel in &self.relationships {
            rel.validate()?;
        }
        Ok(())
    }
}

/// First value (in input order) occurring more than once, with its count.
fn first_repeated(values: impl Iterator<Item = String>) -> Option<(String, usize)> {
    let values: Vec<String> = values.collect();
    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(values.len());
    for v in &values {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }
    values
        .iter()
        .find(|v| counts[v.as_str()] > 1)
        .map(|v| (v.clone(), counts[v.as_str()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Property;

    fn node(label: &str, key: &str) -> Node {
        Node::new(label, Property::new(key, "string").unwrap(), []).unwrap()
    }

    fn rel(ty: &str, start: &str, end: &str) -> Relationship {
        Relationship::new(ty, start, end).unwrap()
    }

    fn people_and_companies() -> DataModel {
        DataModel::new(
            vec![node("Person", "id"), node("Company", "code")],
            vec![rel("WORKS_FOR", "Person", "Company")],
        )
        .unwrap()
    }

    #[test]
    fn test_valid_nodes() {
        let model = DataModel::new(vec![node("Person", "id"), node("Company", "code")], vec![]).unwrap();
        assert_eq!(model.nodes().len(), 2);
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let err = DataModel::new(vec![node("Person", "id"), node("Person", "id")], vec![]).unwrap_err();
        assert_eq!(err.to_string(), "Node with label Person appears 2 times in data model");
    }

    #[test]
    fn test_duplicate_patterns_rejected() {
        let err = DataModel::new(
            vec![node("Person", "id")],
            vec![rel("KNOWS", "Person", "Person"), rel("KNOWS", "Person", "Person")],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Relationship with pattern (:Person)-[:KNOWS]->(:Person) appears 2 times in data model"
        );
    }

    #[test]
    fn test_duplicate_labels_checked_before_patterns() {
        let err = DataModel::new(
            vec![node("Person", "id"), node("Person", "id")],
            vec![rel("KNOWS", "Person", "Person"), rel("KNOWS", "Person", "Person")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateLabel { .. }));
    }

    #[test]
    fn test_dangling_endpoint_rejected() {
        let err = DataModel::new(vec![node("Person", "id")], vec![rel("WORKS_FOR", "Person", "Company")])
            .unwrap_err();
        match err {
            Error::DanglingEndpoint { pattern, label } => {
                assert_eq!(pattern, "(:Person)-[:WORKS_FOR]->(:Company)");
                assert_eq!(label, "Company");
            }
            other => panic!("expected DanglingEndpoint, got {:?}", other),
        }
    }

    #[test]
    fn test_add_node_duplicate_label() {
        let mut model = people_and_companies();
        match model.add_node(node("Person", "other")) {
            Err(Error::DuplicateLabel { label, count }) => {
                assert_eq!(label, "Person");
                assert_eq!(count, 2);
            }
            other => panic!("expected DuplicateLabel, got {:?}", other),
        }
        assert_eq!(model.nodes().len(), 2);
    }

    #[test]
    fn test_add_relationship_duplicate_pattern() {
        let mut model = people_and_companies();
        let err = model.add_relationship(rel("WORKS_FOR", "Person", "Company")).unwrap_err();
        assert!(matches!(err, Error::DuplicatePattern { count: 2, .. }));
    }

    #[test]
    fn test_add_relationship_dangling_is_rolled_back() {
        let mut model = people_and_companies();
        let err = model.add_relationship(rel("LOCATED_IN", "Company", "City")).unwrap_err();
        assert!(matches!(err, Error::DanglingEndpoint { ref label, .. } if label == "City"));
        assert_eq!(model.relationships().len(), 1);
        model.validate().unwrap();
    }

    #[test]
    fn test_remove_node_surfaces_dangling_relationship() {
        let mut model = people_and_companies();
        let err = model.remove_node("Company").unwrap_err();
        assert!(matches!(err, Error::DanglingEndpoint { ref label, .. } if label == "Company"));
        assert!(model.node("Company").is_none());
        assert_eq!(model.relationships().len(), 1);

        model.remove_relationship("WORKS_FOR", "Person", "Company").unwrap();
        model.validate().unwrap();
    }

    #[test]
    fn test_remove_absent_entities_is_noop() {
        let mut model = people_and_companies();
        model.remove_node("Ghost").unwrap();
        model.remove_relationship("KNOWS", "Person", "Person").unwrap();
        assert_eq!(model, people_and_companies());
    }

    #[test]
    fn test_lookup() {
        let model = people_and_companies();
        assert!(model.node("Person").is_some());
        assert!(model.relationship("WORKS_FOR", "Person", "Company").is_some());
        assert!(model.relationship("WORKS_FOR", "Company", "Person").is_none());
    }

    #[test]
    fn test_missing_key_in_json_rejected() {
        let json = r#"{"nodes":[{"label":"Person","properties":[]}],"relationships":[]}"#;
        assert!(matches!(DataModel::from_json(json), Err(Error::MissingKeyProperty(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let model = people_and_companies();
        let json = model.to_json().unwrap();
        assert_eq!(DataModel::from_json(&json).unwrap(), model);
    }

    #[test]
    fn test_from_json_keeps_error_kind() {
        let json = r#"{"nodes":[
            {"label":"Person","key_property":{"name":"id","type":"string"}},
            {"label":"Person","key_property":{"name":"id","type":"string"}}
        ]}"#;
        assert!(matches!(
            DataModel::from_json(json),
            Err(Error::DuplicateLabel { count: 2, .. })
        ));
        assert!(matches!(DataModel::from_json("{not json"), Err(Error::Json(_))));
    }
}
