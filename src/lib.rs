//! # graph-schema — Property Graph Data Models
//!
//! An intermediate representation for property-graph schemas: node types,
//! relationship types and their typed properties, with the invariants
//! that keep a model loadable.
//!
//! ## Design Principles
//!
//! 1. **Validated at every step**: construction and every structural
//!    mutation re-run the full model validation
//! 2. **Typed at the boundary**: Arrows' `TYPE | description | KEY` strings
//!    are parsed on import and only re-encoded on export
//! 3. **Generation is pure**: Cypher and Mermaid output are plain strings;
//!    executing them is the caller's business
//!
//! ## Quick Start
//!
//! ```rust
//! use graph_schema::{DataModel, Node, Property, Relationship, CypherConfig};
//!
//! # fn example() -> graph_schema::Result<()> {
//! let person = Node::new("Person", Property::new("id", "string")?, [Property::new("name", "string")?])?;
//! let company = Node::new("Company", Property::new("id", "string")?, [])?;
//!
//! let mut model = DataModel::new(vec![person, company], vec![])?;
//! model.add_relationship(Relationship::new("WORKS_FOR", "Person", "Company")?)?;
//!
//! let constraints = graph_schema::cypher::constraint_queries(&model)?;
//! let ingest = graph_schema::cypher::relationship_query(&model, "WORKS_FOR", "Person", "Company")?;
//! let plan = graph_schema::IngestPlan::for_model(&model, &CypherConfig::default())?;
//! let arrows = graph_schema::arrows::to_arrows_json(&model)?;
//! let diagram = graph_schema::mermaid::to_mermaid(&model)?;
//! # let _ = (constraints, ingest, plan, arrows, diagram);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Outputs
//!
//! | Output | Module | Description |
//! |--------|--------|-------------|
//! | Arrows JSON | `arrows` | Import/export for the Arrows drawing tool |
//! | Ingest Cypher | `cypher` | `UNWIND $records` + `MERGE` per node / pattern |
//! | Constraints | `cypher` | `NODE KEY` / `RELATIONSHIP KEY` per key property |
//! | Mermaid | `mermaid` | Flowchart text for diagram viewers |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod arrows;
pub mod cypher;
pub mod mermaid;
pub mod config;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    DataModel, Node, Relationship, Property, PropertySource,
    Metadata, KEY_MARKER,
};

// ============================================================================
// Re-exports: Transcoding and generation
// ============================================================================

pub use arrows::{from_arrows_json, to_arrows_json, ArrowsDocument};
pub use cypher::{CypherStatement, IngestPlan, StatementKind, INGEST_PROCESS};
pub use config::{CypherConfig, GridLayout};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Property {name} appears {count} times in {owner}")]
    DuplicateProperty { name: String, owner: String, count: usize },

    #[error("Node with label {label} appears {count} times in data model")]
    DuplicateLabel { label: String, count: usize },

    #[error("Relationship with pattern {pattern} appears {count} times in data model")]
    DuplicatePattern { pattern: String, count: usize },

    #[error("Relationship {pattern} references missing node label {label}")]
    DanglingEndpoint { pattern: String, label: String },

    #[error("Missing key property on {0}")]
    MissingKeyProperty(String),

    #[error("Unknown node label: {0}")]
    UnknownLabel(String),

    #[error("Unknown relationship pattern: {0}")]
    UnknownPattern(String),

    #[error("Malformed Arrows document: {0}")]
    MalformedExternalFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
