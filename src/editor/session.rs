use anyhow::{anyhow, bail, Result};
use uuid::Uuid;

use super::dispatch::{classify, Action, ClickTarget};
use super::mode::Mode;
use super::selection::Selection;
use crate::graph::random;
use crate::graph::store::{GraphStore, Link, LinkPatch, Node, NodeId, NodePatch};
use crate::persistence::document::GraphDocument;
use crate::render::Renderer;

pub const DEFAULT_GRAPH_NAME: &str = "My Graph";
pub const DEFAULT_NODE_COLOR: &str = "#4F46E5";
pub const DEFAULT_EDGE_COLOR: &str = "#9CA3AF";

/// Render weight for nodes added by hand.
const NEW_NODE_VAL: f64 = 10.0;
/// Weight for links created by the two-click flow.
const NEW_LINK_VALUE: f64 = 1.0;

/// Pending name/color for node creation, doubling as the node edit form.
#[derive(Clone, Debug)]
pub struct NodeForm {
    pub name: String,
    pub color: String,
}

/// Pending label/color for edge creation, doubling as the link edit form.
#[derive(Clone, Debug)]
pub struct EdgeForm {
    pub label: String,
    pub color: String,
}

/// What a click ended up doing, for callers that surface it to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickEffect {
    Selected,
    Focused(NodeId),
    AnchorSet(NodeId),
    AnchorKept,
    LinkCreated { source: NodeId, target: NodeId },
    EditTargetLoaded,
    NodeAdded(NodeId),
    SelectionCleared,
    Ignored,
}

/// One editing session: the graph plus every piece of interaction state the
/// renderer does not own. All mutation funnels through the click handlers
/// and the form-driven operations below.
pub struct EditorSession {
    store: GraphStore,
    mode: Mode,
    selection: Selection,
    edge_anchor: Option<NodeId>,
    graph_name: String,
    max_nodes: usize,
    pub node_form: NodeForm,
    pub edge_form: EdgeForm,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        EditorSession {
            store: GraphStore::new(),
            mode: Mode::default(),
            selection: Selection::default(),
            edge_anchor: None,
            graph_name: DEFAULT_GRAPH_NAME.to_string(),
            max_nodes: random::DEFAULT_MAX_NODES,
            node_form: NodeForm {
                name: String::new(),
                color: DEFAULT_NODE_COLOR.to_string(),
            },
            edge_form: EdgeForm {
                label: String::new(),
                color: DEFAULT_EDGE_COLOR.to_string(),
            },
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn edge_anchor(&self) -> Option<&NodeId> {
        self.edge_anchor.as_ref()
    }

    pub fn graph_name(&self) -> &str {
        &self.graph_name
    }

    pub fn set_graph_name(&mut self, name: impl Into<String>) {
        self.graph_name = name.into();
    }

    pub fn set_max_nodes(&mut self, max_nodes: usize) {
        self.max_nodes = max_nodes;
    }

    /// Explicit mode selection. Abandons the pending edge anchor and any
    /// half-typed creation text; form colors are preferences and survive.
    pub fn set_mode(&mut self, mode: Mode) {
        log::debug!("mode {} -> {}", self.mode.label(), mode.label());
        self.edge_anchor = None;
        self.node_form.name.clear();
        self.edge_form.label.clear();
        self.mode = mode;
    }

    /// Abort the two-click edge flow and return to view mode.
    pub fn cancel_edge(&mut self) {
        self.edge_anchor = None;
        self.mode = Mode::View;
    }

    pub fn click_node(&mut self, id: &NodeId, renderer: &mut dyn Renderer) -> Result<ClickEffect> {
        let node = self
            .store
            .get_node(id)
            .ok_or_else(|| anyhow!("no such node: {id}"))?
            .clone();

        let action = classify(self.mode, self.edge_anchor.as_ref(), ClickTarget::Node(id));
        match action {
            Action::SetAnchor(id) => {
                self.edge_anchor = Some(id.clone());
                Ok(ClickEffect::AnchorSet(id))
            }
            Action::KeepAnchor => Ok(ClickEffect::AnchorKept),
            Action::CompleteLink { source, target } => {
                let label = self.edge_form.label.trim();
                let link = Link {
                    id: Some(format!("link-{}", Uuid::now_v7())),
                    source: source.clone(),
                    target: target.clone(),
                    value: NEW_LINK_VALUE,
                    color: self.edge_form.color.clone(),
                    label: (!label.is_empty()).then(|| label.to_string()),
                };
                // Both endpoints were just clicked and the anchor differs
                // from the target, so this cannot fail
                self.store.add_link(link);
                self.edge_anchor = None;
                self.edge_form.label.clear();
                self.mode = Mode::View;
                log::debug!("link created {source} -> {target}");
                Ok(ClickEffect::LinkCreated { source, target })
            }
            Action::LoadNodeIntoForm(id) => {
                self.node_form.name = node.name.clone();
                self.node_form.color = node.color.clone();
                self.selection.select_node(id);
                Ok(ClickEffect::EditTargetLoaded)
            }
            Action::FocusNode(id) => {
                self.selection.select_node(id.clone());
                renderer.focus_on(&node);
                Ok(ClickEffect::Focused(id))
            }
            _ => Ok(ClickEffect::Ignored),
        }
    }

    pub fn click_link(&mut self, source: &NodeId, target: &NodeId) -> Result<ClickEffect> {
        let link = self
            .store
            .find_link(source, target)
            .ok_or_else(|| anyhow!("no link {source} -> {target}"))?
            .clone();

        let action = classify(
            self.mode,
            self.edge_anchor.as_ref(),
            ClickTarget::Link { source, target },
        );
        match action {
            Action::LoadLinkIntoForm { source, target } => {
                self.edge_form.label = link.label.clone().unwrap_or_default();
                self.edge_form.color = link.color.clone();
                self.selection.select_link(source, target);
                Ok(ClickEffect::EditTargetLoaded)
            }
            Action::SelectLink { source, target } => {
                self.selection.select_link(source, target);
                Ok(ClickEffect::Selected)
            }
            _ => Ok(ClickEffect::Ignored),
        }
    }

    pub fn click_background(&mut self, renderer: &mut dyn Renderer) -> Result<ClickEffect> {
        let action = classify(self.mode, self.edge_anchor.as_ref(), ClickTarget::Background);
        match action {
            Action::ClearSelection => {
                self.selection.clear();
                Ok(ClickEffect::SelectionCleared)
            }
            Action::SpawnNode => {
                let name = self.node_form.name.trim();
                let name = if name.is_empty() {
                    format!("Node {}", self.store.node_count() + 1)
                } else {
                    name.to_string()
                };
                let node = Node {
                    id: NodeId::fresh(),
                    name,
                    val: NEW_NODE_VAL,
                    color: self.node_form.color.clone(),
                    position: Some(renderer.screen_center_to_world()),
                };
                let id = node.id.clone();
                self.store.add_node(node);
                self.node_form.name.clear();
                self.mode = Mode::View;
                log::debug!("node added {id}");
                Ok(ClickEffect::NodeAdded(id))
            }
            _ => Ok(ClickEffect::Ignored),
        }
    }

    /// Merge the node form into the selected node, then drop back to view.
    pub fn apply_node_edit(&mut self) -> Result<NodeId> {
        let id = self
            .selection
            .node()
            .cloned()
            .ok_or_else(|| anyhow!("no node selected"))?;
        let name = self.node_form.name.trim();
        let patch = NodePatch {
            name: (!name.is_empty()).then(|| name.to_string()),
            color: Some(self.node_form.color.clone()),
        };
        self.store.update_node(&id, patch);
        self.selection.clear();
        self.node_form.name.clear();
        self.mode = Mode::View;
        Ok(id)
    }

    /// Merge the edge form into the selected link (all parallel copies),
    /// then drop back to view. An empty label clears the stored label.
    pub fn apply_link_edit(&mut self) -> Result<(NodeId, NodeId)> {
        let (source, target) = self
            .selection
            .link()
            .map(|(s, t)| (s.clone(), t.clone()))
            .ok_or_else(|| anyhow!("no link selected"))?;
        let label = self.edge_form.label.trim();
        let patch = LinkPatch {
            label: Some((!label.is_empty()).then(|| label.to_string())),
            color: Some(self.edge_form.color.clone()),
        };
        self.store.update_link(&source, &target, patch);
        self.selection.clear();
        self.edge_form.label.clear();
        self.mode = Mode::View;
        Ok((source, target))
    }

    /// Delete whatever is selected. Node deletion cascades to its links.
    pub fn delete_selected(&mut self) -> Result<()> {
        match std::mem::take(&mut self.selection) {
            Selection::Node(id) => {
                self.store.remove_node(&id);
                log::debug!("node removed {id}");
            }
            Selection::Link { source, target } => {
                self.store.remove_link(&source, &target);
                log::debug!("link removed {source} -> {target}");
            }
            Selection::None => bail!("nothing selected"),
        }
        self.mode = Mode::View;
        Ok(())
    }

    /// Replace the whole graph with a fresh random one and reset the
    /// interaction state.
    pub fn generate_new(&mut self, node_count: usize) -> Result<()> {
        let store = random::generate(node_count, self.max_nodes)?;
        log::info!(
            "generated graph: {} nodes, {} links",
            store.node_count(),
            store.link_count()
        );
        self.store = store;
        self.selection.clear();
        self.edge_anchor = None;
        self.mode = Mode::View;
        Ok(())
    }

    /// Snapshot for export. Positions never leave the session.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument::from_graph(&self.graph_name, &self.store)
    }

    /// Full replacement from an already-validated document. The document
    /// keeps its own name only when it has one; mode and selection reset.
    pub fn apply_document(&mut self, document: GraphDocument) {
        let (name, store) = document.into_graph();
        if let Some(name) = name {
            self.graph_name = name;
        }
        self.store = store;
        self.selection.clear();
        self.edge_anchor = None;
        self.mode = Mode::View;
    }
}
