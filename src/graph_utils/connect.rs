use super::graph::{DiagramGraph, NodeData};
use super::ids::NodeId;

/// Which kind of edge a connect gesture produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnectionMode {
    Flow,
    Link,
}

/// Gate every connect gesture passes before anything reaches the remote
/// store. A rejection here means no remote call and no local mutation.
pub fn is_valid_connection(
    graph: &DiagramGraph,
    source: NodeId,
    target: NodeId,
    mode: ConnectionMode,
) -> bool {
    // No self-loops, in any mode
    if source == target {
        return false;
    }

    match mode {
        ConnectionMode::Flow => {
            // Flows run stock to stock, nothing else
            let src_is_stock = matches!(
                graph.get_node(source).map(|n| &n.data),
                Some(NodeData::Stock { .. })
            );
            let tgt_is_stock = matches!(
                graph.get_node(target).map(|n| &n.data),
                Some(NodeData::Stock { .. })
            );
            src_is_stock && tgt_is_stock
        }
        ConnectionMode::Link => {
            // Links into a rate node are the intended use...
            if matches!(
                graph.get_node(target).map(|n| &n.data),
                Some(NodeData::FlowRate { .. })
            ) {
                return true;
            }
            // ...but any other pairing is deliberately allowed as well
            true
        }
    }
}
