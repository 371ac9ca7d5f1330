//! Mermaid flowchart rendering of a data model.
//!
//! Produces a `graph TD` diagram: one box per node listing its label and
//! properties, one labeled arrow per relationship. Paste the output into
//! a ```` ```mermaid ```` block or the Mermaid Live Editor.

use crate::model::DataModel;
use crate::{Error, Result};

/// Render `model` as Mermaid flowchart text.
///
/// The model is validated first; an invalid model is reported, never
/// partially drawn. Output depends only on entity order.
pub fn to_mermaid(model: &DataModel) -> Result<String> {
    model.validate()?;

    let mut out = String::from("graph TD\n");

    for (index, node) in model.nodes().iter().enumerate() {
        let text = entity_text(node.label(), node.all_properties_view());
        out.push_str(&format!("    n{}[\"{}\"]\n", index, text));
    }

    for rel in model.relationships() {
        let from = node_index(model, rel.start_node_label())?;
        let to = node_index(model, rel.end_node_label())?;
        let text = entity_text(rel.rel_type(), rel.all_properties_view());
        out.push_str(&format!(
            "    n{} -->|\"{}\"| n{}\n",
            from,
            text.replace('|', "#124;"),
            to
        ));
    }

    Ok(out)
}

/// `Name<br/>prop: TYPE<br/>...`, escaped for a quoted Mermaid label.
fn entity_text(name: &str, properties: Vec<(String, String)>) -> String {
    let mut text = escape(name);
    for (prop, ty) in properties {
        text.push_str(&format!("<br/>{}: {}", escape(&prop), escape(&ty)));
    }
    text
}

fn node_index(model: &DataModel, label: &str) -> Result<usize> {
    model
        .nodes()
        .iter()
        .position(|n| n.label() == label)
        .ok_or_else(|| Error::UnknownLabel(label.to_string()))
}

/// Mermaid entity codes for characters that break quoted labels.
fn escape(s: &str) -> String {
    s.replace('"', "#quot;").replace('<', "#lt;").replace('>', "#gt;")
}
