//! # Arrows Transcoder
//!
//! Two-way mapping between a [`DataModel`] and the node-link JSON used by
//! the Arrows graph-drawing tool.
//!
//! ```text
//! Arrows JSON ──from_arrows_json()──▶ DataModel ──to_arrows_json()──▶ Arrows JSON
//! ```
//!
//! Property values in Arrows are `TYPE | description | KEY` strings; see
//! [`encoding`]. Node `position`, `style` and `caption` survive the trip
//! through [`Node::metadata`], relationship `style` through
//! [`Relationship::metadata`] and the document `style` through
//! [`DataModel::metadata`].

pub mod encoding;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::debug;

use crate::config::GridLayout;
use crate::model::{DataModel, Metadata, Node, Property, Relationship};
use crate::{Error, Result};
use encoding::PropertySpec;

pub const POSITION: &str = "position";
pub const STYLE: &str = "style";
pub const CAPTION: &str = "caption";

// ============================================================================
// Wire types
// ============================================================================

/// A complete Arrows document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrowsDocument {
    pub nodes: Vec<ArrowsNode>,
    #[serde(default)]
    pub relationships: Vec<ArrowsRelationship>,
    #[serde(default)]
    pub style: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowsNode {
    pub id: String,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Property name → encoded `TYPE | description | KEY` string.
    #[serde(default)]
    pub properties: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ArrowsPosition>,
    #[serde(default)]
    pub style: Metadata,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowsRelationship {
    #[serde(default)]
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: Metadata,
    #[serde(default)]
    pub style: Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowsPosition {
    pub x: f64,
    pub y: f64,
}

// ============================================================================
// Import
// ============================================================================

/// Parse Arrows JSON text into a validated data model.
pub fn from_arrows_json(json: &str) -> Result<DataModel> {
    let doc: ArrowsDocument = serde_json::from_str(json)
        .map_err(|e| Error::MalformedExternalFormat(e.to_string()))?;
    from_arrows(&doc)
}

/// Convert an Arrows document into a validated data model.
pub fn from_arrows(doc: &ArrowsDocument) -> Result<DataModel> {
    let mut id_to_label: HashMap<&str, &str> = HashMap::with_capacity(doc.nodes.len());
    let mut nodes = Vec::with_capacity(doc.nodes.len());

    for arrows_node in &doc.nodes {
        let label = arrows_node.labels.first().ok_or_else(|| {
            Error::MalformedExternalFormat(format!("node {} has no labels", arrows_node.id))
        })?;
        if id_to_label.insert(&arrows_node.id, label).is_some() {
            return Err(Error::MalformedExternalFormat(format!(
                "node id {} is used more than once",
                arrows_node.id
            )));
        }
        nodes.push(import_node(label, arrows_node)?);
    }

    let mut relationships = Vec::with_capacity(doc.relationships.len());
    for arrows_rel in &doc.relationships {
        let endpoint = |id: &str| {
            id_to_label.get(id).copied().ok_or_else(|| {
                Error::MalformedExternalFormat(format!(
                    "relationship {} references unknown node id {}",
                    arrows_rel.rel_type, id
                ))
            })
        };
        let start = endpoint(arrows_rel.from_id.as_str())?;
        let end = endpoint(arrows_rel.to_id.as_str())?;
        relationships.push(import_relationship(start, end, arrows_rel)?);
    }

    let mut metadata = Metadata::new();
    if !doc.style.is_empty() {
        metadata.insert(STYLE.into(), Json::Object(doc.style.clone()));
    }

    debug!(nodes = nodes.len(), relationships = relationships.len(), "imported arrows document");
    Ok(DataModel::new(nodes, relationships)?.with_metadata(metadata))
}

fn import_node(label: &str, arrows_node: &ArrowsNode) -> Result<Node> {
    let owner = format!("node {}", label);
    let (key, properties) = split_properties(&owner, &arrows_node.properties)?;
    let key = key.ok_or(Error::MissingKeyProperty(owner))?;

    let mut metadata = Metadata::new();
    if let Some(position) = arrows_node.position {
        metadata.insert(POSITION.into(), serde_json::to_value(position)?);
    }
    if !arrows_node.style.is_empty() {
        metadata.insert(STYLE.into(), Json::Object(arrows_node.style.clone()));
    }
    if !arrows_node.caption.is_empty() {
        metadata.insert(CAPTION.into(), Json::String(arrows_node.caption.clone()));
    }

    Ok(Node::new(label, key, properties)?.with_metadata(metadata))
}

fn import_relationship(start: &str, end: &str, arrows_rel: &ArrowsRelationship) -> Result<Relationship> {
    let owner = format!(
        "relationship {}",
        crate::model::pattern(&arrows_rel.rel_type, start, end)
    );
    let (key, properties) = split_properties(&owner, &arrows_rel.properties)?;

    let mut metadata = Metadata::new();
    if !arrows_rel.style.is_empty() {
        metadata.insert(STYLE.into(), Json::Object(arrows_rel.style.clone()));
    }

    Ok(Relationship::new(&arrows_rel.rel_type, start, end)?
        .with_key_property(key)
        .with_properties(properties)?
        .with_metadata(metadata))
}

/// Decode every property and separate the (single) key from the rest.
fn split_properties(owner: &str, encoded: &Metadata) -> Result<(Option<Property>, Vec<Property>)> {
    let mut key = None;
    let mut properties = Vec::with_capacity(encoded.len());
    for (name, value) in encoded {
        let raw = value.as_str().ok_or_else(|| {
            Error::MalformedExternalFormat(format!(
                "property {} of {} is not a string: {}",
                name, owner, value
            ))
        })?;
        let spec = PropertySpec::parse(name, raw)?;
        let is_key = spec.is_key;
        let prop = spec.into_property(name)?;
        if !is_key {
            properties.push(prop);
        } else if key.is_none() {
            key = Some(prop);
        } else {
            return Err(Error::MalformedExternalFormat(format!(
                "{} marks more than one property as KEY",
                owner
            )));
        }
    }
    Ok((key, properties))
}

// ============================================================================
// Export
// ============================================================================

/// Serialize a model as pretty-printed Arrows JSON using the default grid.
pub fn to_arrows_json(model: &DataModel) -> Result<String> {
    let doc = to_arrows(model, &GridLayout::default())?;
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Convert a model into an Arrows document.
///
/// Nodes keep a stored `position`; the rest are placed on `layout` by
/// their index in the model.
pub fn to_arrows(model: &DataModel, layout: &GridLayout) -> Result<ArrowsDocument> {
    model.validate()?;

    let mut label_to_id: HashMap<&str, String> = HashMap::with_capacity(model.nodes().len());
    let mut nodes = Vec::with_capacity(model.nodes().len());
    for (index, node) in model.nodes().iter().enumerate() {
        let id = format!("n{}", index);
        label_to_id.insert(node.label(), id.clone());
        nodes.push(export_node(id, index, node, layout)?);
    }

    let mut relationships = Vec::with_capacity(model.relationships().len());
    for (index, rel) in model.relationships().iter().enumerate() {
        // Endpoints exist: the model was validated above.
        let endpoint = |label: &str| {
            label_to_id
                .get(label)
                .cloned()
                .ok_or_else(|| Error::UnknownLabel(label.to_string()))
        };
        relationships.push(ArrowsRelationship {
            id: format!("r{}", index),
            from_id: endpoint(rel.start_node_label())?,
            to_id: endpoint(rel.end_node_label())?,
            rel_type: rel.rel_type().to_string(),
            properties: encode_properties(rel.key_property(), rel.properties())?,
            style: object_field(rel.metadata(), STYLE),
        });
    }

    debug!(nodes = nodes.len(), relationships = relationships.len(), "exported arrows document");
    Ok(ArrowsDocument {
        nodes,
        relationships,
        style: object_field(model.metadata(), STYLE),
    })
}

fn export_node(id: String, index: usize, node: &Node, layout: &GridLayout) -> Result<ArrowsNode> {
    let key = node.require_key()?;
    let position = node
        .metadata()
        .get(POSITION)
        .and_then(|v| serde_json::from_value::<ArrowsPosition>(v.clone()).ok())
        .unwrap_or_else(|| {
            let (x, y) = layout.position(index);
            ArrowsPosition { x, y }
        });
    let caption = node
        .metadata()
        .get(CAPTION)
        .and_then(Json::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ArrowsNode {
        id,
        labels: vec![node.label().to_string()],
        properties: encode_properties(Some(key), node.properties())?,
        position: Some(position),
        style: object_field(node.metadata(), STYLE),
        caption,
    })
}

fn encode_properties(key: Option<&Property>, properties: &[Property]) -> Result<Metadata> {
    let mut out = Metadata::new();
    if let Some(key) = key {
        let encoded = PropertySpec::from_property(key, true).encode(key.name())?;
        out.insert(key.name().to_string(), Json::String(encoded));
    }
    for prop in properties {
        let encoded = PropertySpec::from_property(prop, false).encode(prop.name())?;
        out.insert(prop.name().to_string(), Json::String(encoded));
    }
    Ok(out)
}

fn object_field(metadata: &Metadata, field: &str) -> Metadata {
    match metadata.get(field) {
        Some(Json::Object(map)) => map.clone(),
        _ => Metadata::new(),
    }
}
