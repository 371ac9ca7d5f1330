//! # Cypher Generation
//!
//! Parameterized bulk-ingest queries and key constraints for a
//! [`DataModel`](crate::DataModel). Pure functions: the text is handed to
//! an external executor together with a `records` list parameter.

pub mod escape;
pub mod ingest;
pub mod plan;
pub mod schema;

pub use escape::{escape_identifier, is_valid_identifier};
pub use ingest::{
    node_query, node_query_for_label, node_query_for_label_with, node_query_with,
    relationship_query, relationship_query_with, SOURCE_ID, TARGET_ID,
};
pub use plan::{CypherStatement, IngestPlan, StatementKind, INGEST_PROCESS};
pub use schema::{constraint_queries, node_constraint, relationship_constraint};
