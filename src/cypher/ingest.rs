//! Bulk-ingest query templates.
//!
//! Every query takes one list parameter (`$records` by default) and is
//! keyed on the entity's key property with `MERGE`, so re-running it
//! with the same records creates nothing new.

use tracing::debug;

use super::escape::escape_identifier;
use crate::config::CypherConfig;
use crate::model::{pattern, DataModel, Node, Property};
use crate::{Error, Result};

/// Record field holding the start node's key value.
pub const SOURCE_ID: &str = "sourceId";
/// Record field holding the end node's key value.
pub const TARGET_ID: &str = "targetId";

/// Ingest query for many records of one node type.
///
/// ```text
/// UNWIND $records AS record
/// MERGE (n:Person {id: record.id})
/// SET n += {name: record.name}
/// ```
pub fn node_query(node: &Node) -> Result<String> {
    node_query_with(node, &CypherConfig::default())
}

/// [`node_query`] with an explicit config.
pub fn node_query_with(node: &Node, config: &CypherConfig) -> Result<String> {
    let key = node.require_key()?;
    let mut query = unwind(config);
    query.push_str(&format!(
        "MERGE (n:{} {})\n",
        escape_identifier(node.label()),
        key_map(key, &record_field(key.name()))
    ));
    push_set(&mut query, "n", node.properties());
    debug!(label = node.label(), "generated node ingest query");
    Ok(query)
}

/// Ingest query for the node with `label` in `model`.
pub fn node_query_for_label(model: &DataModel, label: &str) -> Result<String> {
    node_query_for_label_with(model, label, &CypherConfig::default())
}

pub fn node_query_for_label_with(model: &DataModel, label: &str, config: &CypherConfig) -> Result<String> {
    let node = model
        .node(label)
        .ok_or_else(|| Error::UnknownLabel(label.to_string()))?;
    node_query_with(node, config)
}

/// Ingest query for many records of one relationship pattern.
///
/// `model` must hold the relationship and both endpoint nodes. Records
/// carry `sourceId` and `targetId` (the endpoints' key values) plus the
/// relationship's own properties.
///
/// ```text
/// UNWIND $records AS record
/// MATCH (source:Person {id: record.sourceId})
/// MATCH (target:Company {id: record.targetId})
/// MERGE (source)-[r:WORKS_FOR]->(target)
/// SET r += {since: record.since}
/// ```
pub fn relationship_query(
    model: &DataModel,
    rel_type: &str,
    start_label: &str,
    end_label: &str,
) -> Result<String> {
    relationship_query_with(model, rel_type, start_label, end_label, &CypherConfig::default())
}

/// [`relationship_query`] with an explicit config.
pub fn relationship_query_with(
    model: &DataModel,
    rel_type: &str,
    start_label: &str,
    end_label: &str,
    config: &CypherConfig,
) -> Result<String> {
    let rel = model
        .relationship(rel_type, start_label, end_label)
        .ok_or_else(|| Error::UnknownPattern(pattern(rel_type, start_label, end_label)))?;
    let start = model
        .node(start_label)
        .ok_or_else(|| Error::UnknownLabel(start_label.to_string()))?;
    let end = model
        .node(end_label)
        .ok_or_else(|| Error::UnknownLabel(end_label.to_string()))?;
    let start_key = start.require_key()?;
    let end_key = end.require_key()?;

    let mut query = unwind(config);
    query.push_str(&format!(
        "MATCH (source:{} {})\n",
        escape_identifier(start.label()),
        key_map(start_key, &record_field(SOURCE_ID))
    ));
    query.push_str(&format!(
        "MATCH (target:{} {})\n",
        escape_identifier(end.label()),
        key_map(end_key, &record_field(TARGET_ID))
    ));
    let rel_key = rel
        .key_property()
        .map(|k| format!(" {}", key_map(k, &record_field(k.name()))))
        .unwrap_or_default();
    query.push_str(&format!(
        "MERGE (source)-[r:{}{}]->(target)\n",
        escape_identifier(rel.rel_type()),
        rel_key
    ));
    push_set(&mut query, "r", rel.properties());
    debug!(pattern = %rel.pattern(), "generated relationship ingest query");
    Ok(query)
}

fn unwind(config: &CypherConfig) -> String {
    format!(
        "UNWIND ${} AS record\n",
        escape_identifier(&config.records_parameter)
    )
}

fn record_field(name: &str) -> String {
    format!("record.{}", escape_identifier(name))
}

fn key_map(key: &Property, value: &str) -> String {
    format!("{{{}: {}}}", escape_identifier(key.name()), value)
}

fn push_set(query: &mut String, alias: &str, properties: &[Property]) {
    if properties.is_empty() {
        return;
    }
    let assignments: Vec<String> = properties
        .iter()
        .map(|p| format!("{}: {}", escape_identifier(p.name()), record_field(p.name())))
        .collect();
    query.push_str(&format!("SET {} += {{{}}}\n", alias, assignments.join(", ")));
}
