//! The `TYPE | description | KEY` strings Arrows stores as property values.
//!
//! Values are parsed into [`PropertySpec`] as soon as they are read and
//! only re-encoded on export.

use smallvec::SmallVec;
use tracing::trace;

use crate::model::{Property, KEY_MARKER};
use crate::{Error, Result};

const SEPARATOR: char = '|';

/// Decoded form of one Arrows property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    pub property_type: String,
    pub description: Option<String>,
    pub is_key: bool,
}

impl PropertySpec {
    /// Parse `TYPE[|description][|KEY]`. Segments are trimmed and the
    /// `KEY` token is matched case-insensitively.
    pub fn parse(name: &str, encoded: &str) -> Result<Self> {
        let segments: SmallVec<[&str; 3]> = encoded.split(SEPARATOR).map(str::trim).collect();
        if segments.len() > 3 {
            return Err(malformed(name, encoded, "too many '|' segments"));
        }
        let property_type = segments[0];
        if property_type.is_empty() || is_key_token(property_type) {
            return Err(malformed(name, encoded, "missing type"));
        }

        let mut description = None;
        let mut is_key = false;
        for segment in &segments[1..] {
            if is_key_token(segment) {
                if is_key {
                    return Err(malformed(name, encoded, "KEY given twice"));
                }
                is_key = true;
            } else if is_key {
                return Err(malformed(name, encoded, "description after KEY"));
            } else if description.is_some() {
                return Err(malformed(name, encoded, "more than one description"));
            } else if !segment.is_empty() {
                description = Some(segment.to_string());
            }
        }

        trace!(name, property_type, is_key, "parsed arrows property");
        Ok(Self {
            property_type: property_type.to_string(),
            description,
            is_key,
        })
    }

    pub fn from_property(prop: &Property, is_key: bool) -> Self {
        Self {
            property_type: prop.property_type().to_string(),
            description: prop.description().map(str::to_string),
            is_key,
        }
    }

    /// Encode back to `TYPE | description | KEY`, omitting absent parts.
    ///
    /// Fails with `InvalidValue` when a part could not be parsed back,
    /// e.g. a description containing `|`.
    pub fn encode(&self, name: &str) -> Result<String> {
        if self.property_type.contains(SEPARATOR) || is_key_token(self.property_type.trim()) {
            return Err(Error::InvalidValue(format!(
                "type of property {} cannot be encoded for Arrows: {:?}",
                name, self.property_type
            )));
        }
        let mut out = self.property_type.clone();
        if let Some(desc) = self.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            if desc.contains(SEPARATOR) || is_key_token(desc) {
                return Err(Error::InvalidValue(format!(
                    "description of property {} cannot be encoded for Arrows: {:?}",
                    name, desc
                )));
            }
            out.push_str(" | ");
            out.push_str(desc);
        }
        if self.is_key {
            out.push_str(" | ");
            out.push_str(KEY_MARKER);
        }
        Ok(out)
    }

    pub fn into_property(self, name: &str) -> Result<Property> {
        let prop = Property::new(name, &self.property_type)?;
        Ok(match self.description {
            Some(desc) => prop.with_description(desc),
            None => prop,
        })
    }
}

fn is_key_token(segment: &str) -> bool {
    segment.eq_ignore_ascii_case(KEY_MARKER)
}

fn malformed(name: &str, encoded: &str, reason: &str) -> Error {
    Error::MalformedExternalFormat(format!(
        "property {} has value {:?}: {}",
        name, encoded, reason
    ))
}
