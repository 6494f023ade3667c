use crate::graph_utils::graph::Node;
use crate::graph_utils::ids::NodeId;

/// At most one focused node, held as a snapshot for the property panel.
/// Edits patch the snapshot together with the graph so the panel shows the
/// change before (and regardless of) remote confirmation.
#[derive(Debug, Default)]
pub struct Selection {
    focused: Option<Node>,
}

impl Selection {
    pub fn new() -> Self {
        Selection { focused: None }
    }

    pub fn focus(&mut self, node: Node) {
        self.focused = Some(node);
    }

    // Background click, or the focused entity got deleted
    pub fn clear(&mut self) {
        self.focused = None;
    }

    pub fn focused(&self) -> Option<&Node> {
        self.focused.as_ref()
    }

    pub fn is_focused(&self, id: NodeId) -> bool {
        self.focused.as_ref().is_some_and(|n| n.id == id)
    }

    /// Apply the same mutation to the snapshot that was applied to the graph,
    /// if this node is the focused one.
    pub fn patch(&mut self, id: NodeId, apply: impl FnOnce(&mut Node)) {
        if let Some(node) = self.focused.as_mut()
            && node.id == id
        {
            apply(node);
        }
    }
}
