//! End-to-end tests for generated Cypher: ingest queries, constraints and
//! the ordered ingest plan.
//!
//! There is no database here; the tests pin the query text and the
//! MERGE/MATCH structure that makes repeated runs idempotent.

use graph_schema::cypher::{self, IngestPlan, StatementKind};
use graph_schema::{CypherConfig, DataModel, Error, Node, Property, Relationship};
use pretty_assertions::assert_eq;

fn prop(name: &str, ty: &str) -> Property {
    Property::new(name, ty).unwrap()
}

fn works_for_model() -> DataModel {
    DataModel::new(
        vec![
            Node::new("Person", prop("id", "string"), [prop("name", "string")]).unwrap(),
            Node::new("Company", prop("id", "string"), [prop("name", "string")]).unwrap(),
        ],
        vec![Relationship::new("WORKS_FOR", "Person", "Company").unwrap()],
    )
    .unwrap()
}

// ============================================================================
// 1. Relationship ingest: MATCH endpoints by key, MERGE the edge
// ============================================================================

#[test]
fn test_relationship_ingest_is_idempotent_shape() {
    let query = cypher::relationship_query(&works_for_model(), "WORKS_FOR", "Person", "Company").unwrap();

    let lines: Vec<&str> = query.lines().collect();
    assert_eq!(lines[0], "UNWIND $records AS record");
    assert_eq!(lines[1], "MATCH (source:Person {id: record.sourceId})");
    assert_eq!(lines[2], "MATCH (target:Company {id: record.targetId})");
    assert_eq!(lines[3], "MERGE (source)-[r:WORKS_FOR]->(target)");
    // Only MATCH/MERGE: running the same records twice adds nothing.
    assert!(!query.contains("CREATE"));
}

#[test]
fn test_relationship_ingest_needs_endpoint_keys() {
    let json = r#"{"label":"Company"}"#;
    let keyless: Node = serde_json::from_str(json).unwrap();
    assert!(keyless.key_property().is_none());
    assert!(matches!(keyless.validate(), Err(Error::MissingKeyProperty(_))));
    // A model cannot hold the keyless node at all.
    let person = Node::new("Person", prop("id", "string"), []).unwrap();
    assert!(matches!(
        DataModel::new(vec![person, keyless], vec![]),
        Err(Error::MissingKeyProperty(_))
    ));
}

#[test]
fn test_relationship_ingest_unknown_pattern() {
    let err = cypher::relationship_query(&works_for_model(), "EMPLOYS", "Company", "Person").unwrap_err();
    assert_eq!(err.to_string(), "Unknown relationship pattern: (:Company)-[:EMPLOYS]->(:Person)");
}

// ============================================================================
// 2. Node ingest
// ============================================================================

#[test]
fn test_node_ingest_merges_on_key() {
    let model = works_for_model();
    let query = cypher::node_query_for_label(&model, "Company").unwrap();
    assert_eq!(
        query,
        "UNWIND $records AS record\nMERGE (n:Company {id: record.id})\nSET n += {name: record.name}\n"
    );
}

// ============================================================================
// 3. Constraints
// ============================================================================

#[test]
fn test_constraint_for_keyless_node_fails() {
    let keyless: Node = serde_json::from_str(r#"{"label":"Person","properties":[{"name":"name","type":"string"}]}"#).unwrap();
    assert!(matches!(
        cypher::node_constraint(&keyless),
        Err(Error::MissingKeyProperty(ref owner)) if owner == "node Person"
    ));
}

#[test]
fn test_constraints_cover_every_key() {
    let mut model = works_for_model();
    model
        .add_relationship(
            Relationship::new("KNOWS", "Person", "Person")
                .unwrap()
                .with_key_property(prop("since", "date")),
        )
        .unwrap();
    let queries = cypher::constraint_queries(&model).unwrap();
    assert_eq!(
        queries,
        vec![
            "CREATE CONSTRAINT IF NOT EXISTS FOR (n:Person) REQUIRE (n.id) IS NODE KEY".to_string(),
            "CREATE CONSTRAINT IF NOT EXISTS FOR (n:Company) REQUIRE (n.id) IS NODE KEY".to_string(),
            "CREATE CONSTRAINT IF NOT EXISTS FOR ()-[r:KNOWS]-() REQUIRE (r.since) IS RELATIONSHIP KEY".to_string(),
        ]
    );
}

// ============================================================================
// 4. Ingest plan follows the documented process
// ============================================================================

#[test]
fn test_plan_follows_ingest_process() {
    let plan = IngestPlan::for_model(&works_for_model(), &CypherConfig::default()).unwrap();
    let kinds: Vec<StatementKind> = plan.statements().map(|s| s.kind).collect();
    let first_node = kinds.iter().position(|k| *k == StatementKind::NodeIngest).unwrap();
    let first_rel = kinds.iter().position(|k| *k == StatementKind::RelationshipIngest).unwrap();
    assert!(kinds[..first_node].iter().all(|k| *k == StatementKind::Constraint));
    assert!(first_node < first_rel);
    // One relationship statement per pattern.
    assert_eq!(plan.relationships.len(), 1);
    assert!(graph_schema::INGEST_PROCESS.contains("constraints before loading"));
}
