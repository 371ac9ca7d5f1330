//! Node type in the graph schema.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::properties::{self, Metadata};
use super::Property;
use crate::{Error, Result};

/// A labeled vertex type: one key property plus non-key properties.
///
/// The key is an `Option` only so that drafts received as JSON can be
/// represented and reported; [`Node::validate`] and every generator
/// reject a node without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeDef")]
pub struct Node {
    label: String,
    key_property: Option<Property>,
    properties: Vec<Property>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

/// Unvalidated wire shape of a [`Node`].
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeDef {
    label: String,
    #[serde(default)]
    key_property: Option<Property>,
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(default)]
    metadata: Metadata,
}

impl TryFrom<NodeDef> for Node {
    type Error = Error;

    fn try_from(def: NodeDef) -> Result<Self> {
        Self::assemble(def.label, def.key_property, def.properties, def.metadata)
    }
}

impl Node {
    /// Create a node. Non-key entries named like the key are dropped;
    /// any other repeated name fails with `DuplicateProperty`.
    pub fn new(
        label: impl Into<String>,
        key_property: Property,
        properties: impl IntoIterator<Item = Property>,
    ) -> Result<Self> {
        Self::assemble(
            label.into(),
            Some(key_property),
            properties.into_iter().collect(),
            Metadata::new(),
        )
    }

    fn assemble(
        label: String,
        key_property: Option<Property>,
        mut properties: Vec<Property>,
        metadata: Metadata,
    ) -> Result<Self> {
        if label.trim().is_empty() {
            return Err(Error::InvalidValue("node label must not be empty".into()));
        }
        let owner = owner(&label);
        properties::drop_key_duplicates(key_property.as_ref(), &mut properties, &owner);
        if let Some(key) = &key_property {
            key.validate()?;
        }
        for p in &properties {
            p.validate()?;
        }
        properties::ensure_unique_names(&properties, &owner)?;
        Ok(Self { label, key_property, properties, metadata })
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn key_property(&self) -> Option<&Property> {
        self.key_property.as_ref()
    }

    /// The key property, or `MissingKeyProperty`.
    pub fn require_key(&self) -> Result<&Property> {
        self.key_property
            .as_ref()
            .ok_or_else(|| Error::MissingKeyProperty(owner(&self.label)))
    }

    /// Non-key properties in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn add_property(&mut self, prop: Property) -> Result<()> {
        debug!(label = %self.label, property = prop.name(), "adding node property");
        properties::add_property(
            self.key_property.as_ref(),
            &mut self.properties,
            prop,
            &owner(&self.label),
        )
    }

    pub fn remove_property(&mut self, prop: &Property) {
        properties::remove_property(&mut self.properties, prop);
    }

    /// Name → type for every property; the key's type carries `| KEY`.
    pub fn all_properties_view(&self) -> Vec<(String, String)> {
        properties::view(self.key_property.as_ref(), &self.properties)
    }

    /// Full standalone check: scalars, property names and key presence.
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(Error::InvalidValue("node label must not be empty".into()));
        }
        let key = self.require_key()?;
        key.validate()?;
        let owner = owner(&self.label);
        if self.properties.iter().any(|p| p.name() == key.name()) {
            return Err(Error::DuplicateProperty {
                name: key.name().to_string(),
                owner,
                count: 2,
            });
        }
        for p in &self.properties {
            p.validate()?;
        }
        properties::ensure_unique_names(&self.properties, &owner)
    }
}

fn owner(label: &str) -> String {
    format!("node {}", label)
}
