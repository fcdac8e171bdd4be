use std::fmt;

use uuid::Uuid;

use crate::render::Coordinate;

/// Node identifier. String-backed so documents loaded from disk keep their
/// original ids verbatim; freshly minted ids are UUIDv7 strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn fresh() -> Self {
        NodeId(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Render weight, arbitrary units. Positive.
    pub val: f64,
    pub color: String,
    /// Set when the renderer has placed the node, or pinned at spawn.
    pub position: Option<Coordinate>,
}

/// Directed edge. Links are identified by their ordered `(source, target)`
/// pair; `id` is informational and not required to be present or unique.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub id: Option<String>,
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
    pub color: String,
    pub label: Option<String>,
}

/// Fields to merge into an existing node. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct NodePatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Fields to merge into existing links. The outer `Option` on `label` leaves
/// the field untouched; the inner value replaces it (`None` clears it).
#[derive(Clone, Debug, Default)]
pub struct LinkPatch {
    pub label: Option<Option<String>>,
    pub color: Option<String>,
}

/// In-memory editor graph: nodes unique by id, links in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStore {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn get_node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// First link matching the ordered pair. Parallel edges are legal, so
    /// callers that care about all of them iterate `links` directly.
    pub fn find_link(&self, source: &NodeId, target: &NodeId) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| &l.source == source && &l.target == target)
    }

    // Append a node; refuses an id collision
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.contains_node(&node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    // Append a link if both endpoints exist and it is not a self-loop.
    // No duplicate-pair check: user-driven creation may add parallel edges.
    pub fn add_link(&mut self, link: Link) -> bool {
        if link.source == link.target {
            return false;
        }
        if !self.contains_node(&link.source) || !self.contains_node(&link.target) {
            return false;
        }
        self.links.push(link);
        true
    }

    pub fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        if let Some(node) = self.get_node_mut(id) {
            if let Some(name) = patch.name {
                node.name = name;
            }
            if let Some(color) = patch.color {
                node.color = color;
            }
            true
        } else {
            false
        }
    }

    /// Merge into every link matching the ordered pair.
    pub fn update_link(&mut self, source: &NodeId, target: &NodeId, patch: LinkPatch) -> bool {
        let mut touched = false;
        for link in self
            .links
            .iter_mut()
            .filter(|l| &l.source == source && &l.target == target)
        {
            if let Some(label) = patch.label.clone() {
                link.label = label;
            }
            if let Some(color) = patch.color.clone() {
                link.color = color;
            }
            touched = true;
        }
        touched
    }

    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| &n.id != id);
        if self.nodes.len() == before {
            return false;
        }
        // Cascade: drop every link referencing the node as source or target
        self.links.retain(|l| &l.source != id && &l.target != id);
        true
    }

    /// Remove every link matching the ordered pair.
    pub fn remove_link(&mut self, source: &NodeId, target: &NodeId) -> bool {
        let before = self.links.len();
        self.links
            .retain(|l| !(&l.source == source && &l.target == target));
        self.links.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node {
            id: id.into(),
            name: format!("Node {id}"),
            val: 10.0,
            color: "#4F46E5".to_string(),
            position: None,
        }
    }

    fn link(source: &str, target: &str) -> Link {
        Link {
            id: None,
            source: source.into(),
            target: target.into(),
            value: 1.0,
            color: "#9CA3AF".to_string(),
            label: None,
        }
    }

    #[test]
    fn add_node_rejects_duplicate_id() {
        let mut store = GraphStore::new();
        assert!(store.add_node(node("a")));
        assert!(!store.add_node(node("a")));
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn add_link_rejects_self_loop_and_missing_endpoints() {
        let mut store = GraphStore::new();
        store.add_node(node("a"));
        store.add_node(node("b"));
        assert!(!store.add_link(link("a", "a")));
        assert!(!store.add_link(link("a", "ghost")));
        assert!(store.add_link(link("a", "b")));
        // Parallel edges are allowed
        assert!(store.add_link(link("a", "b")));
        assert_eq!(store.link_count(), 2);
    }

    #[test]
    fn remove_node_cascades_links() {
        let mut store = GraphStore::new();
        store.add_node(node("a"));
        store.add_node(node("b"));
        store.add_node(node("c"));
        store.add_link(link("a", "b"));
        store.add_link(link("c", "a"));
        store.add_link(link("b", "c"));
        assert!(store.remove_node(&"a".into()));
        assert_eq!(store.link_count(), 1);
        let id: NodeId = "a".into();
        assert!(store
            .links
            .iter()
            .all(|l| l.source != id && l.target != id));
    }

    #[test]
    fn update_link_touches_all_parallel_edges() {
        let mut store = GraphStore::new();
        store.add_node(node("a"));
        store.add_node(node("b"));
        store.add_link(link("a", "b"));
        store.add_link(link("a", "b"));
        let patch = LinkPatch {
            label: Some(Some("dup".to_string())),
            color: None,
        };
        assert!(store.update_link(&"a".into(), &"b".into(), patch));
        assert!(store
            .links
            .iter()
            .all(|l| l.label.as_deref() == Some("dup")));
    }
}
