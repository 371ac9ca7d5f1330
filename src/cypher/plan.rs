//! Ordered ingest plan for an external query executor.
//!
//! ```text
//! DataModel → IngestPlan::for_model() → constraints, nodes, relationships
//!   → run each statement with $records, or write_script() for review
//! ```
//!
//! The plan only orders statements; executing them (and batching the
//! records) is the caller's job.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use super::{ingest, schema};
use crate::config::CypherConfig;
use crate::model::DataModel;
use crate::Result;

/// The ingestion steps the generated statements assume.
pub const INGEST_PROCESS: &str = "\
Follow these steps when ingesting data into Neo4j.
1. Create constraints before loading any data.
2. Load all nodes before relationships.
3. Then load relationships serially, one pattern at a time, to avoid deadlocks.
";

/// What a statement does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    Constraint,
    NodeIngest,
    RelationshipIngest,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Constraint => write!(f, "constraint"),
            StatementKind::NodeIngest => write!(f, "node ingest"),
            StatementKind::RelationshipIngest => write!(f, "relationship ingest"),
        }
    }
}

/// One generated Cypher statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CypherStatement {
    pub kind: StatementKind,
    /// Label or pattern the statement targets.
    pub target: String,
    pub query: String,
}

/// All statements needed to load a model, grouped by step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestPlan {
    pub constraints: Vec<CypherStatement>,
    pub nodes: Vec<CypherStatement>,
    pub relationships: Vec<CypherStatement>,
}

impl IngestPlan {
    pub fn for_model(model: &DataModel, config: &CypherConfig) -> Result<Self> {
        model.validate()?;

        let constraints = schema::constraint_queries(model)?
            .into_iter()
            .map(|query| CypherStatement {
                kind: StatementKind::Constraint,
                target: constraint_target(&query),
                query,
            })
            .collect();

        let nodes = model
            .nodes()
            .iter()
            .map(|node| {
                Ok(CypherStatement {
                    kind: StatementKind::NodeIngest,
                    target: node.label().to_string(),
                    query: ingest::node_query_with(node, config)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let relationships = model
            .relationships()
            .iter()
            .map(|rel| {
                Ok(CypherStatement {
                    kind: StatementKind::RelationshipIngest,
                    target: rel.pattern(),
                    query: ingest::relationship_query_with(
                        model,
                        rel.rel_type(),
                        rel.start_node_label(),
                        rel.end_node_label(),
                        config,
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { constraints, nodes, relationships })
    }

    /// Statements in execution order.
    pub fn statements(&self) -> impl Iterator<Item = &CypherStatement> {
        self.constraints
            .iter()
            .chain(self.nodes.iter())
            .chain(self.relationships.iter())
    }

    pub fn len(&self) -> usize {
        self.constraints.len() + self.nodes.len() + self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the plan as a commented Cypher script.
    pub fn write_script(&self, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "// graph-schema ingest plan")?;
        for line in INGEST_PROCESS.lines() {
            writeln!(writer, "// {}", line)?;
        }
        writeln!(writer, "// Constraints: {}", self.constraints.len())?;
        writeln!(writer, "// Nodes: {}", self.nodes.len())?;
        writeln!(writer, "// Relationships: {}", self.relationships.len())?;

        for stmt in self.statements() {
            writeln!(writer)?;
            writeln!(writer, "// {}: {}", stmt.kind, stmt.target)?;
            writeln!(writer, "{};", stmt.query.trim_end())?;
        }
        Ok(())
    }
}

/// Pull the `FOR ...` target out of a constraint statement.
fn constraint_target(query: &str) -> String {
    query
        .split_once(" FOR ")
        .and_then(|(_, rest)| rest.split_once(" REQUIRE "))
        .map(|(target, _)| target.to_string())
        .unwrap_or_default()
}
