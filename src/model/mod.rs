//! # Graph Schema Model
//!
//! Entity definitions for a property-graph data model: properties,
//! node types, relationship types and the aggregate that ties them
//! together. Every other module consumes these types.
//!
//! This module is pure data — no I/O, no shared state, no async.

pub mod property;
pub mod properties;
pub mod node;
pub mod relationship;
pub mod data_model;

pub use property::{Property, PropertySource};
pub use properties::{Metadata, KEY_MARKER};
pub use node::Node;
pub use relationship::{pattern, Relationship};
pub use data_model::DataModel;
