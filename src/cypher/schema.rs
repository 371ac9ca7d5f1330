//! Key constraints (unique + required) for nodes and relationships.

use hashbrown::HashSet;
use tracing::debug;

use super::escape::escape_identifier;
use crate::model::{DataModel, Node, Relationship};
use crate::Result;

/// `NODE KEY` constraint on the node's key property.
///
/// Unnamed: Neo4j generates the name and `IF NOT EXISTS` matches on
/// label and property.
///
/// ```text
/// CREATE CONSTRAINT IF NOT EXISTS FOR (n:Person) REQUIRE (n.id) IS NODE KEY
/// ```
pub fn node_constraint(node: &Node) -> Result<String> {
    let key = node.require_key()?;
    Ok(format!(
        "CREATE CONSTRAINT IF NOT EXISTS FOR (n:{}) REQUIRE (n.{}) IS NODE KEY",
        escape_identifier(node.label()),
        escape_identifier(key.name()),
    ))
}

/// `RELATIONSHIP KEY` constraint, or `None` for a relationship without a key.
///
/// Neo4j scopes the constraint to the relationship type, not the pattern.
pub fn relationship_constraint(rel: &Relationship) -> Option<String> {
    let key = rel.key_property()?;
    Some(format!(
        "CREATE CONSTRAINT IF NOT EXISTS FOR ()-[r:{}]-() REQUIRE (r.{}) IS RELATIONSHIP KEY",
        escape_identifier(rel.rel_type()),
        escape_identifier(key.name()),
    ))
}

/// Constraint statements for every key in the model.
///
/// Node constraints come first, in model order. Relationship constraints
/// sharing a type and key name are emitted once.
pub fn constraint_queries(model: &DataModel) -> Result<Vec<String>> {
    model.validate()?;
    let mut queries = Vec::with_capacity(model.nodes().len() + model.relationships().len());
    for node in model.nodes() {
        queries.push(node_constraint(node)?);
    }
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for rel in model.relationships() {
        let Some(key) = rel.key_property() else { continue };
        if !seen.insert((rel.rel_type(), key.name())) {
            continue;
        }
        queries.extend(relationship_constraint(rel));
    }
    debug!(count = queries.len(), "generated constraint queries");
    Ok(queries)
}
