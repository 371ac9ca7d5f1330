//! Property-list rules shared by nodes and relationships.

use hashbrown::HashMap;
use tracing::warn;

use super::Property;
use crate::{Error, Result};

/// Opaque round-trip data (layout, style, captions) attached to an entity.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Suffix appended to the key property's type in property views.
pub const KEY_MARKER: &str = "KEY";

/// Drop non-key entries that repeat the key property's name.
///
/// This is the only silent correction the model performs; every other
/// duplicate is an error.
pub(crate) fn drop_key_duplicates(key: Option<&Property>, properties: &mut Vec<Property>, owner: &str) {
    let Some(key) = key else { return };
    let before = properties.len();
    properties.retain(|p| p.name() != key.name());
    if properties.len() != before {
        warn!(owner, key = key.name(), "dropped property entry duplicating the key property");
    }
}

/// Fail with `DuplicateProperty` if two entries share a name.
pub(crate) fn ensure_unique_names(properties: &[Property], owner: &str) -> Result<()> {
    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(properties.len());
    for p in properties {
        *counts.entry(p.name()).or_insert(0) += 1;
    }
    // Report in declaration order so the error is deterministic.
    for p in properties {
        let count = counts[p.name()];
        if count > 1 {
            return Err(Error::DuplicateProperty {
                name: p.name().to_string(),
                owner: owner.to_string(),
                count,
            });
        }
    }
    Ok(())
}

/// Append `prop` unless it collides with an existing entry.
///
/// A property named like the key is absorbed without being stored.
pub(crate) fn add_property(
    key: Option<&Property>,
    properties: &mut Vec<Property>,
    prop: Property,
    owner: &str,
) -> Result<()> {
    prop.validate()?;
    if key.is_some_and(|k| k.name() == prop.name()) {
        warn!(owner, key = prop.name(), "ignored property duplicating the key property");
        return Ok(());
    }
    if properties.iter().any(|p| p.name() == prop.name()) {
        return Err(Error::DuplicateProperty {
            name: prop.name().to_string(),
            owner: owner.to_string(),
            count: 2,
        });
    }
    properties.push(prop);
    Ok(())
}

/// Remove an exact match of `prop`; absent entries are ignored.
pub(crate) fn remove_property(properties: &mut Vec<Property>, prop: &Property) {
    if let Some(pos) = properties.iter().position(|p| p == prop) {
        properties.remove(pos);
    }
}

/// Name → type pairs, key first with its type suffixed by `| KEY`.
pub(crate) fn view(key: Option<&Property>, properties: &[Property]) -> Vec<(String, String)> {
    let mut out = Vec::with_capacity(properties.len() + 1);
    if let Some(key) = key {
        out.push((key.name().to_string(), format!("{} | {}", key.property_type(), KEY_MARKER)));
    }
    out.extend(
        properties
            .iter()
            .map(|p| (p.name().to_string(), p.property_type().to_string())),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str) -> Property {
        Property::new(name, "STRING").unwrap()
    }

    #[test]
    fn test_drop_key_duplicates_only_touches_key_name() {
        let key = prop("id");
        let mut props = vec![prop("name"), prop("id"), prop("email")];
        drop_key_duplicates(Some(&key), &mut props, "node Person");
        let names: Vec<_> = props.iter().map(Property::name).collect();
        assert_eq!(names, vec!["name", "email"]);
    }

    #[test]
    fn test_drop_key_duplicates_without_key_is_noop() {
        let mut props = vec![prop("id"), prop("id")];
        drop_key_duplicates(None, &mut props, "relationship R");
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_ensure_unique_names_reports_count() {
        let props = vec![prop("name"), prop("age"), prop("name"), prop("name")];
        match ensure_unique_names(&props, "node Person") {
            Err(Error::DuplicateProperty { name, owner, count }) => {
                assert_eq!(name, "name");
                assert_eq!(owner, "node Person");
                assert_eq!(count, 3);
            }
            other => panic!("expected DuplicateProperty, got {:?}", other),
        }
    }

    #[test]
    fn test_view_marks_key() {
        let key = prop("id");
        let view = view(Some(&key), &[Property::new("age", "integer").unwrap()]);
        assert_eq!(
            view,
            vec![
                ("id".to_string(), "STRING | KEY".to_string()),
                ("age".to_string(), "INTEGER".to_string()),
            ]
        );
        assert_eq!(key.property_type(), "STRING");
    }
}
