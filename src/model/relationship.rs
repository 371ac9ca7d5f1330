//! Relationship type in the graph schema.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::properties::{self, Metadata};
use super::Property;
use crate::{Error, Result};

/// Canonical `(:Start)-[:TYPE]->(:End)` rendering of a relationship pattern.
///
/// This string is the identity of a relationship within a data model.
pub fn pattern(rel_type: &str, start_node_label: &str, end_node_label: &str) -> String {
    format!("(:{})-[:{}]->(:{})", start_node_label, rel_type, end_node_label)
}

/// A typed, directed edge type between two node labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RelationshipDef")]
pub struct Relationship {
    #[serde(rename = "type")]
    rel_type: String,
    start_node_label: String,
    end_node_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_property: Option<Property>,
    properties: Vec<Property>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

/// Unvalidated wire shape of a [`Relationship`].
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RelationshipDef {
    #[serde(rename = "type")]
    rel_type: String,
    start_node_label: String,
    end_node_label: String,
    #[serde(default)]
    key_property: Option<Property>,
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(default)]
    metadata: Metadata,
}

impl TryFrom<RelationshipDef> for Relationship {
    type Error = Error;

    fn try_from(def: RelationshipDef) -> Result<Self> {
        Self::new(def.rel_type, def.start_node_label, def.end_node_label)?
            .with_key_property(def.key_property)
            .with_properties(def.properties)
            .map(|rel| rel.with_metadata(def.metadata))
    }
}

impl Relationship {
    /// Create a relationship without properties.
    pub fn new(
        rel_type: impl Into<String>,
        start_node_label: impl Into<String>,
        end_node_label: impl Into<String>,
    ) -> Result<Self> {
        let rel = Self {
            rel_type: rel_type.into(),
            start_node_label: start_node_label.into(),
            end_node_label: end_node_label.into(),
            key_property: None,
            properties: Vec::new(),
            metadata: Metadata::new(),
        };
        rel.validate_names()?;
        Ok(rel)
    }

    /// Set the key. Existing non-key entries with the key's name are dropped.
    pub fn with_key_property(mut self, key: impl Into<Option<Property>>) -> Self {
        self.key_property = key.into();
        let owner = self.owner();
        properties::drop_key_duplicates(self.key_property.as_ref(), &mut self.properties, &owner);
        self
    }

    /// Replace the non-key properties, applying the same rules as `Node::new`.
    pub fn with_properties(mut self, props: impl IntoIterator<Item = Property>) -> Result<Self> {
        let mut props: Vec<Property> = props.into_iter().collect();
        let owner = self.owner();
        properties::drop_key_duplicates(self.key_property.as_ref(), &mut props, &owner);
        for p in self.key_property.iter().chain(props.iter()) {
            p.validate()?;
        }
        properties::ensure_unique_names(&props, &owner)?;
        self.properties = props;
        Ok(self)
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    pub fn start_node_label(&self) -> &str {
        &self.start_node_label
    }

    pub fn end_node_label(&self) -> &str {
        &self.end_node_label
    }

    pub fn key_property(&self) -> Option<&Property> {
        self.key_property.as_ref()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// `(:Start)-[:TYPE]->(:End)`.
    pub fn pattern(&self) -> String {
        pattern(&self.rel_type, &self.start_node_label, &self.end_node_label)
    }

    pub fn add_property(&mut self, prop: Property) -> Result<()> {
        debug!(pattern = %self.pattern(), property = prop.name(), "adding relationship property");
        let owner = self.owner();
        properties::add_property(self.key_property.as_ref(), &mut self.properties, prop, &owner)
    }

    pub fn remove_property(&mut self, prop: &Property) {
        properties::remove_property(&mut self.properties, prop);
    }

    /// Name → type for every property; the key's type carries `| KEY`.
    pub fn all_properties_view(&self) -> Vec<(String, String)> {
        properties::view(self.key_property.as_ref(), &self.properties)
    }

    /// Standalone check of names and properties. The key is optional.
    pub fn validate(&self) -> Result<()> {
        self.validate_names()?;
        let owner = self.owner();
        if let Some(key) = &self.key_property {
            key.validate()?;
            if self.properties.iter().any(|p| p.name() == key.name()) {
                return Err(Error::DuplicateProperty {
                    name: key.name().to_string(),
                    owner,
                    count: 2,
                });
            }
        }
        for p in &self.properties {
            p.validate()?;
        }
        properties::ensure_unique_names(&self.properties, &owner)
    }

    fn validate_names(&self) -> Result<()> {
        if self.rel_type.trim().is_empty() {
            return Err(Error::InvalidValue("relationship type must not be empty".into()));
        }
        if self.start_node_label.trim().is_empty() || self.end_node_label.trim().is_empty() {
            return Err(Error::InvalidValue(format!(
                "relationship {} needs both endpoint labels",
                self.rel_type
            )));
        }
        Ok(())
    }

    fn owner(&self) -> String {
        format!("relationship {}", self.pattern())
    }
}
