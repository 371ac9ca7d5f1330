//! Property descriptors and their provenance.

use serde::{Deserialize, Deserializer, Serialize};

use super::KEY_MARKER;
use crate::{Error, Result};

/// Where a property's values come from, if known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySource {
    /// The column name this property maps to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    /// The table (or file) holding that column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Physical location of the table, e.g. a URI or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl PropertySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column_name = Some(column.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table_name = Some(table.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A typed property on a node or relationship.
///
/// The Neo4j type name is upper-cased on every construction path,
/// including deserialization, so `"string"` and `"STRING"` compare equal.
/// Descriptions are trimmed and a blank one is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    name: String,
    #[serde(rename = "type", deserialize_with = "deserialize_type")]
    property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<PropertySource>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_description"
    )]
    description: Option<String>,
}

impl Property {
    /// Create a property. Fails with `InvalidValue` on an empty name.
    pub fn new(name: impl Into<String>, property_type: impl AsRef<str>) -> Result<Self> {
        let prop = Self {
            name: name.into(),
            property_type: normalize_type(property_type.as_ref()),
            source: None,
            description: None,
        };
        prop.validate()?;
        Ok(prop)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_description(description.into());
        self
    }

    pub fn with_source(mut self, source: PropertySource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> &str {
        &self.property_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source(&self) -> Option<&PropertySource> {
        self.source.as_ref()
    }

    /// Check the scalar rules. Deserialized properties skip `new`, so
    /// the owning entity calls this when it is assembled.
    ///
    /// `KEY` is reserved as the key marker and is not a type.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidValue("property name must not be empty".into()));
        }
        if self.property_type.is_empty() {
            return Err(Error::InvalidValue(format!(
                "property {} has an empty type",
                self.name
            )));
        }
        if self.property_type.eq_ignore_ascii_case(KEY_MARKER) {
            return Err(Error::InvalidValue(format!(
                "property {} cannot have type {}",
                self.name, KEY_MARKER
            )));
        }
        Ok(())
    }
}

fn normalize_type(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn normalize_description(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == raw.len() {
        Some(raw)
    } else {
        Some(trimmed.to_string())
    }
}

fn deserialize_description<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(normalize_description))
}

fn deserialize_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_type(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_is_upper_cased() {
        let prop = Property::new("name", "string").unwrap();
        assert_eq!(prop.property_type(), "STRING");
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Property::new("", "STRING").unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn test_empty_type_rejected() {
        let err = Property::new("name", "  ").unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn test_key_type_rejected() {
        for ty in ["KEY", "key", " Key "] {
            assert!(matches!(Property::new("a", ty), Err(Error::InvalidValue(_))), "{:?}", ty);
        }
        let draft: Property = serde_json::from_str(r#"{"name":"a","type":"key"}"#).unwrap();
        assert!(matches!(draft.validate(), Err(Error::InvalidValue(_))));
    }

    #[test]
    fn test_description_is_trimmed() {
        let prop = Property::new("id", "STRING").unwrap();
        assert_eq!(prop.clone().with_description(" padded ").description(), Some("padded"));
        assert_eq!(prop.clone().with_description("").description(), None);
        assert_eq!(prop.with_description(" \t").description(), None);

        let json = r#"{"name":"id","type":"STRING","description":"  Unique id "}"#;
        let back: Property = serde_json::from_str(json).unwrap();
        assert_eq!(back.description(), Some("Unique id"));
        let blank: Property = serde_json::from_str(r#"{"name":"id","type":"STRING","description":""}"#).unwrap();
        assert_eq!(blank.description(), None);
        let null: Property = serde_json::from_str(r#"{"name":"id","type":"STRING","description":null}"#).unwrap();
        assert_eq!(null.description(), None);
    }

    #[test]
    fn test_equality_is_by_value() {
        let a = Property::new("age", "integer").unwrap().with_description("Age in years");
        let b = Property::new("age", "INTEGER").unwrap().with_description("Age in years");
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_description("Other"));
    }

    #[test]
    fn test_deserialize_normalizes_type() {
        let prop: Property = serde_json::from_str(r#"{"name":"since","type":"date"}"#).unwrap();
        assert_eq!(prop.property_type(), "DATE");
        assert_eq!(prop.description(), None);
    }

    #[test]
    fn test_source_round_trips_through_json() {
        let prop = Property::new("id", "STRING")
            .unwrap()
            .with_source(PropertySource::new().with_column("person_id").with_table("people.csv"));
        let json = serde_json::to_string(&prop).unwrap();
        let back: Property = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prop);
        assert_eq!(back.source().unwrap().column_name.as_deref(), Some("person_id"));
        assert_eq!(back.source().unwrap().location, None);
    }
}
