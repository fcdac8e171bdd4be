//! Click classification: the transition table of the editor, kept as a pure
//! function over `(mode, anchor, target)` so every row is testable on its
//! own, without a store or a renderer in sight.

use super::mode::Mode;
use crate::graph::store::NodeId;

/// What the pointer hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget<'a> {
    Node(&'a NodeId),
    Link {
        source: &'a NodeId,
        target: &'a NodeId,
    },
    Background,
}

/// The action a click resolves to under the current mode and anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Remember the clicked node as the pending edge source.
    SetAnchor(NodeId),
    /// Clicked the anchor itself again; a self-link is never offered.
    KeepAnchor,
    /// Second distinct node clicked: create anchor -> node, then fall back
    /// to view mode.
    CompleteLink { source: NodeId, target: NodeId },
    /// Select the node and load its name/color into the edit form.
    LoadNodeIntoForm(NodeId),
    /// Select the link and load its label/color into the edit form.
    LoadLinkIntoForm { source: NodeId, target: NodeId },
    /// Select the node and ask the renderer to frame it.
    FocusNode(NodeId),
    /// Select the link without opening a form.
    SelectLink { source: NodeId, target: NodeId },
    /// Spawn a node at the viewport center, then fall back to view mode.
    SpawnNode,
    ClearSelection,
    Nothing,
}

pub fn classify(mode: Mode, anchor: Option<&NodeId>, target: ClickTarget<'_>) -> Action {
    match (mode, target) {
        (Mode::AddEdge, ClickTarget::Node(id)) => match anchor {
            None => Action::SetAnchor(id.clone()),
            Some(a) if a == id => Action::KeepAnchor,
            Some(a) => Action::CompleteLink {
                source: a.clone(),
                target: id.clone(),
            },
        },
        (Mode::Edit, ClickTarget::Node(id)) => Action::LoadNodeIntoForm(id.clone()),
        (Mode::Edit, ClickTarget::Link { source, target }) => Action::LoadLinkIntoForm {
            source: source.clone(),
            target: target.clone(),
        },
        // Outside add-edge/edit a node click means inspect: select and frame
        (Mode::View | Mode::AddNode, ClickTarget::Node(id)) => Action::FocusNode(id.clone()),
        (Mode::View, ClickTarget::Link { source, target }) => Action::SelectLink {
            source: source.clone(),
            target: target.clone(),
        },
        (Mode::View, ClickTarget::Background) => Action::ClearSelection,
        (Mode::AddNode, ClickTarget::Background) => Action::SpawnNode,
        _ => Action::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        s.into()
    }

    #[test]
    fn add_edge_clicks_walk_the_anchor_states() {
        let a = id("a");
        let b = id("b");
        assert_eq!(
            classify(Mode::AddEdge, None, ClickTarget::Node(&a)),
            Action::SetAnchor(a.clone())
        );
        assert_eq!(
            classify(Mode::AddEdge, Some(&a), ClickTarget::Node(&a)),
            Action::KeepAnchor
        );
        assert_eq!(
            classify(Mode::AddEdge, Some(&a), ClickTarget::Node(&b)),
            Action::CompleteLink {
                source: a.clone(),
                target: b.clone()
            }
        );
    }

    #[test]
    fn background_clicks_depend_on_mode() {
        assert_eq!(
            classify(Mode::View, None, ClickTarget::Background),
            Action::ClearSelection
        );
        assert_eq!(
            classify(Mode::AddNode, None, ClickTarget::Background),
            Action::SpawnNode
        );
        assert_eq!(
            classify(Mode::AddEdge, None, ClickTarget::Background),
            Action::Nothing
        );
        assert_eq!(
            classify(Mode::Edit, None, ClickTarget::Background),
            Action::Nothing
        );
    }

    #[test]
    fn edit_clicks_load_forms() {
        let a = id("a");
        let b = id("b");
        assert_eq!(
            classify(Mode::Edit, None, ClickTarget::Node(&a)),
            Action::LoadNodeIntoForm(a.clone())
        );
        assert_eq!(
            classify(
                Mode::Edit,
                None,
                ClickTarget::Link {
                    source: &a,
                    target: &b
                }
            ),
            Action::LoadLinkIntoForm {
                source: a.clone(),
                target: b.clone()
            }
        );
    }

    #[test]
    fn link_clicks_outside_view_and_edit_do_nothing() {
        let a = id("a");
        let b = id("b");
        let target = ClickTarget::Link {
            source: &a,
            target: &b,
        };
        assert_eq!(classify(Mode::AddEdge, None, target), Action::Nothing);
        assert_eq!(classify(Mode::AddNode, None, target), Action::Nothing);
    }
}
