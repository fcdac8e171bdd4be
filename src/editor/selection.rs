use crate::graph::store::NodeId;

/// The currently highlighted item. A node and a link can never be selected
/// at the same time; the enum carries at most one of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Link { source: NodeId, target: NodeId },
}

impl Selection {
    pub fn select_node(&mut self, id: NodeId) {
        *self = Selection::Node(id);
    }

    pub fn select_link(&mut self, source: NodeId, target: NodeId) {
        *self = Selection::Link { source, target };
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Selection::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn link(&self) -> Option<(&NodeId, &NodeId)> {
        match self {
            Selection::Link { source, target } => Some((source, target)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_one_kind_clears_the_other() {
        let mut sel = Selection::default();
        sel.select_node("a".into());
        assert!(sel.node().is_some());
        sel.select_link("a".into(), "b".into());
        assert!(sel.node().is_none());
        assert!(sel.link().is_some());
        sel.select_node("b".into());
        assert!(sel.link().is_none());
        sel.clear();
        assert!(sel.is_empty());
    }
}
