use std::collections::{BTreeSet, HashSet};

use crate::graph_utils::graph::{DiagramGraph, EdgeData};
use crate::graph_utils::ids::{EdgeId, NodeId, RemoteEntity};

/// Everything a deletion touches: the local node and edge sets to drop, and
/// the distinct remote records to delete. A flow edge and its rate node share
/// one record, so they contribute exactly one entry to `remote`.
#[derive(Debug, Default)]
pub struct RemovalPlan {
    pub nodes: HashSet<NodeId>,
    pub edges: HashSet<EdgeId>,
    pub remote: BTreeSet<RemoteEntity>,
}

impl RemovalPlan {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Resolve the flow ↔ rate-node pairing across a selection before anything is
/// removed, so both halves always go together.
pub fn plan_removal(
    graph: &DiagramGraph,
    selected_nodes: &[NodeId],
    selected_edges: &[EdgeId],
) -> RemovalPlan {
    let mut nodes: HashSet<NodeId> = selected_nodes.iter().copied().collect();
    let mut edges: HashSet<EdgeId> = selected_edges.iter().copied().collect();

    // A selected flow edge pulls in its paired rate node
    for id in selected_edges {
        if let Some(edge) = graph.get_edge(*id)
            && let EdgeData::Flow { rate_node } = edge.data
        {
            nodes.insert(rate_node);
        }
    }

    // A selected rate node pulls in its paired flow edge. When the reverse
    // lookup finds nothing (already removed, or never paired) the node is
    // still dropped locally with no remote call: best effort, not enforced.
    for id in selected_nodes {
        if matches!(id, NodeId::FlowRate(_))
            && let Some(edge_id) = graph.flow_edge_for_rate(*id)
        {
            edges.insert(edge_id);
        }
    }

    // One delete per distinct backing record. Rate nodes own no record of
    // their own; their flow is reached via the derived edge above.
    let mut remote = BTreeSet::new();
    for id in &nodes {
        if let Some(entity) = id.remote_entity() {
            remote.insert(entity);
        }
    }
    for id in &edges {
        if let Some(entity) = id.remote_entity() {
            remote.insert(entity);
        }
    }

    RemovalPlan { nodes, edges, remote }
}
