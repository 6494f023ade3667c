use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ids::{EdgeId, NodeId};

/// Canvas coordinates of a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }

    // A new rate node sits halfway between the two stocks it joins
    pub fn midpoint(a: Position, b: Position) -> Position {
        Position { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 }
    }
}

/// Per-variant node payload. Field values are expression strings; the remote
/// store evaluates them, the client only carries them around.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    Stock { name: String, initial_value: String },
    Variable { name: String, value: String },
    // flow_value doubles as the backing flow's name; it is the single place
    // the rate label is stored, so edge and node can never disagree
    FlowRate { name: String, flow_value: String },
}

impl NodeData {
    pub fn name(&self) -> &str {
        match self {
            NodeData::Stock { name, .. }
            | NodeData::Variable { name, .. }
            | NodeData::FlowRate { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub selected: bool,
    pub data: NodeData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EdgeData {
    /// Back-reference to the paired rate node.
    Flow { rate_node: NodeId },
    Link,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub selected: bool,
    pub data: EdgeData,
}

/// In-memory diagram state: the single source of truth for rendering and for
/// mutation requests. Guarantees structural storage only (unique ids); typing
/// rules live in `connect`, pairing rules in `editor::cascade`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiagramGraph {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
}

impl DiagramGraph {
    pub fn new() -> Self {
        DiagramGraph { nodes: HashMap::new(), edges: HashMap::new() }
    }

    // Insert a node; refuses duplicate ids
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.nodes.insert(node.id, node);
        true
    }

    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        if self.edges.contains_key(&edge.id) {
            return false;
        }
        self.edges.insert(edge.id, edge);
        true
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn node_data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(&id).map(|n| &mut n.data)
    }

    pub fn set_node_position(&mut self, id: NodeId, position: Position) -> bool {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
            true
        } else {
            false
        }
    }

    pub fn set_node_selected(&mut self, id: NodeId, selected: bool) -> bool {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.selected = selected;
            true
        } else {
            false
        }
    }

    pub fn set_edge_selected(&mut self, id: EdgeId, selected: bool) -> bool {
        if let Some(edge) = self.edges.get_mut(&id) {
            edge.selected = selected;
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        for node in self.nodes.values_mut() {
            node.selected = false;
        }
        for edge in self.edges.values_mut() {
            edge.selected = false;
        }
    }

    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter_map(|n| if n.selected { Some(n.id) } else { None })
            .collect()
    }

    pub fn selected_edges(&self) -> Vec<EdgeId> {
        self.edges
            .values()
            .filter_map(|e| if e.selected { Some(e.id) } else { None })
            .collect()
    }

    // Removal by predicate; deletion sets are computed up front by the
    // cascade planner, so these are plain filters
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.nodes.retain(|&id, _| keep(id));
    }

    pub fn retain_edges(&mut self, mut keep: impl FnMut(EdgeId) -> bool) {
        self.edges.retain(|&id, _| keep(id));
    }

    /// Reverse lookup: the flow edge whose back-reference names this rate
    /// node. A full scan is fine at diagram sizes; revisit with an index if
    /// graphs grow past a few thousand edges.
    pub fn flow_edge_for_rate(&self, rate_node: NodeId) -> Option<EdgeId> {
        self.edges
            .values()
            .find(|e| matches!(e.data, EdgeData::Flow { rate_node: r } if r == rate_node))
            .map(|e| e.id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // Reset gesture: drop local state only, never touches the remote store
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}
