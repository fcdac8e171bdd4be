use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::editor::session::{DEFAULT_EDGE_COLOR, DEFAULT_NODE_COLOR};
use crate::graph::store::{GraphStore, Link, Node};

fn default_node_val() -> f64 {
    10.0
}

fn default_node_color() -> String {
    DEFAULT_NODE_COLOR.to_string()
}

fn default_link_value() -> f64 {
    1.0
}

fn default_link_color() -> String {
    DEFAULT_EDGE_COLOR.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_node_val")]
    pub val: f64,
    #[serde(default = "default_node_color")]
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default = "default_link_value")]
    pub value: f64,
    #[serde(default = "default_link_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The persisted file format. Node positions are a renderer concern and are
/// never part of a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub nodes: Vec<NodeDoc>,
    #[serde(default)]
    pub links: Vec<LinkDoc>,
}

impl GraphDocument {
    pub fn from_graph(name: &str, store: &GraphStore) -> Self {
        GraphDocument {
            name: Some(name.to_string()),
            nodes: store
                .nodes
                .iter()
                .map(|n| NodeDoc {
                    id: n.id.as_str().to_string(),
                    name: n.name.clone(),
                    val: n.val,
                    color: n.color.clone(),
                })
                .collect(),
            links: store
                .links
                .iter()
                .map(|l| LinkDoc {
                    id: l.id.clone(),
                    source: l.source.as_str().to_string(),
                    target: l.target.as_str().to_string(),
                    value: l.value,
                    color: l.color.clone(),
                    label: l.label.clone(),
                })
                .collect(),
        }
    }

    /// Turn the document back into runtime state. Entries are taken as-is:
    /// a link whose endpoints are absent from `nodes` is carried along and
    /// surfaces as a downstream renderer problem, not an import failure.
    pub fn into_graph(self) -> (Option<String>, GraphStore) {
        let nodes = self
            .nodes
            .into_iter()
            .map(|d| Node {
                id: d.id.into(),
                name: d.name,
                val: d.val,
                color: d.color,
                position: None,
            })
            .collect();
        let links = self
            .links
            .into_iter()
            .map(|d| Link {
                id: d.id,
                source: d.source.into(),
                target: d.target.into(),
                value: d.value,
                color: d.color,
                label: d.label,
            })
            .collect();
        (self.name, GraphStore { nodes, links })
    }

    /// Parse an imported document. The only hard requirement is a `nodes`
    /// array; `links` falls back to empty when missing or malformed, and
    /// missing node/link fields take their defaults rather than failing.
    pub fn from_json_str(text: &str) -> Result<GraphDocument> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| anyhow!("invalid graph file: {e}"))?;
        let Some(object) = value.as_object() else {
            bail!("invalid graph file: expected a JSON object");
        };
        let Some(nodes_value) = object.get("nodes") else {
            bail!("invalid graph file: missing nodes array");
        };
        if !nodes_value.is_array() {
            bail!("invalid graph file: nodes is not an array");
        }
        let nodes: Vec<NodeDoc> = serde_json::from_value(nodes_value.clone())
            .map_err(|e| anyhow!("invalid graph file: bad node entry: {e}"))?;
        let links: Vec<LinkDoc> = object
            .get("links")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        let name = object
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Ok(GraphDocument { name, nodes, links })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Download-style file name for a graph: whitespace runs collapse to `_`,
/// lowercased, `.json` suffix.
pub fn slug_file_name(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    if slug.is_empty() {
        "graph.json".to_string()
    } else {
        format!("{slug}.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_collapse_whitespace_and_lowercase() {
        assert_eq!(slug_file_name("My  Fancy Graph"), "my_fancy_graph.json");
        assert_eq!(slug_file_name("   "), "graph.json");
    }

    #[test]
    fn import_requires_a_nodes_array() {
        assert!(GraphDocument::from_json_str("{not json").is_err());
        assert!(GraphDocument::from_json_str("{}").is_err());
        assert!(GraphDocument::from_json_str(r#"{"nodes": 3}"#).is_err());
        assert!(GraphDocument::from_json_str(r#"{"nodes": []}"#).is_ok());
    }

    #[test]
    fn malformed_links_fall_back_to_empty() {
        let doc =
            GraphDocument::from_json_str(r#"{"nodes": [{"id": "a"}], "links": "oops"}"#).unwrap();
        assert!(doc.links.is_empty());
        // Defaults fill in the unspecified node fields
        assert_eq!(doc.nodes[0].val, 10.0);
    }

    #[test]
    fn positions_are_stripped_on_export() {
        use crate::render::Coordinate;
        let mut store = GraphStore::new();
        store.add_node(Node {
            id: "a".into(),
            name: "A".into(),
            val: 7.0,
            color: "#FF6B6B".into(),
            position: Some(Coordinate::new(1.0, 2.0, 3.0)),
        });
        let json = GraphDocument::from_graph("g", &store).to_json().unwrap();
        assert!(!json.contains("position"));
        assert!(!json.contains("\"x\""));
    }
}
