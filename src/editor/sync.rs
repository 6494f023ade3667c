use anyhow::{Result, bail};
use log::warn;

use crate::graph_utils::graph::{
    DiagramGraph, Edge, EdgeData, Node, NodeData, Position,
};
use crate::graph_utils::ids::{EdgeId, NodeId, RemoteEntity, RemoteId};
use crate::remote::RemoteStore;

// Draft values for entities the user has not named yet
const DRAFT_FLOW_RATE: &str = "1";
const DRAFT_VALUE: &str = "0";

/// Translates local create/update/delete intents into remote calls and is the
/// only place server-issued ids become local node/edge ids. Local graph
/// mutation stays with the caller; this layer produces the entities to insert.
pub struct RemoteSync<R: RemoteStore> {
    remote: R,
    project_id: RemoteId,
}

impl<R: RemoteStore> RemoteSync<R> {
    pub fn new(remote: R, project_id: RemoteId) -> Self {
        RemoteSync { remote, project_id }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn project_id(&self) -> RemoteId {
        self.project_id
    }

    /// Create a stock in the store and build its node from the returned
    /// record, falling back to drafts where the response leaves fields empty.
    pub async fn create_stock(&self, position: Position) -> Result<Node> {
        let rec = self.remote.create_stock(self.project_id).await?;
        let name = if rec.name.is_empty() { format!("Stock {}", rec.id) } else { rec.name };
        let initial_value =
            if rec.initial_value.is_empty() { DRAFT_VALUE.to_string() } else { rec.initial_value };
        Ok(Node {
            id: NodeId::Stock(rec.id),
            position,
            selected: false,
            data: NodeData::Stock { name, initial_value },
        })
    }

    pub async fn create_variable(&self, draft_name: &str, position: Position) -> Result<Node> {
        let rec = self.remote.create_variable(draft_name, DRAFT_VALUE, self.project_id).await?;
        let name = if rec.name.is_empty() { format!("Variable {}", rec.id) } else { rec.name };
        let value = if rec.value.is_empty() { DRAFT_VALUE.to_string() } else { rec.value };
        Ok(Node {
            id: NodeId::Variable(rec.id),
            position,
            selected: false,
            data: NodeData::Variable { name, value },
        })
    }

    /// One remote create seeds both halves of the pair: the flow edge and the
    /// rate node at the midpoint of the endpoints' positions at connect time.
    pub async fn create_flow(
        &self,
        source: NodeId,
        target: NodeId,
        source_pos: Position,
        target_pos: Position,
    ) -> Result<(Edge, Node)> {
        let (NodeId::Stock(from), NodeId::Stock(to)) = (source, target) else {
            bail!("flow endpoints must be stocks: {} -> {}", source, target);
        };
        let rec = self.remote.create_flow(DRAFT_FLOW_RATE, from, to).await?;

        let rate_node = Node {
            id: NodeId::FlowRate(rec.id),
            position: Position::midpoint(source_pos, target_pos),
            selected: false,
            data: NodeData::FlowRate {
                name: format!("Flow Rate {}", rec.id),
                flow_value: DRAFT_FLOW_RATE.to_string(),
            },
        };
        let edge = Edge {
            id: EdgeId::Flow(rec.id),
            source,
            target,
            selected: false,
            data: EdgeData::Flow { rate_node: rate_node.id },
        };
        Ok((edge, rate_node))
    }

    /// Push the node's current record to the store. The graph has already
    /// been patched optimistically, so reading every field from it yields the
    /// changed field merged with the unchanged ones, which is the full record
    /// the contract requires.
    pub async fn update_from_graph(&self, graph: &DiagramGraph, id: NodeId) -> Result<()> {
        let Some(node) = graph.get_node(id) else {
            bail!("update for unknown node {}", id);
        };
        match (&id, &node.data) {
            (NodeId::Stock(rid), NodeData::Stock { name, initial_value }) => {
                self.remote.update_stock(*rid, name, initial_value).await
            }
            (NodeId::Variable(rid), NodeData::Variable { name, value }) => {
                self.remote.update_variable(*rid, name, value).await
            }
            (NodeId::FlowRate(_), NodeData::FlowRate { flow_value, .. }) => {
                // The rate is the flow's name; resolve the backing record
                // through the paired edge
                match graph.flow_edge_for_rate(id) {
                    Some(EdgeId::Flow(fid)) => self.remote.update_flow(fid, flow_value).await,
                    _ => bail!("rate node {} has no paired flow edge", id),
                }
            }
            _ => bail!("node {} carries data of the wrong variant", id),
        }
    }

    pub async fn delete_entity(&self, entity: RemoteEntity) -> Result<()> {
        match entity {
            RemoteEntity::Stock(id) => self.remote.delete_stock(id).await,
            RemoteEntity::Variable(id) => self.remote.delete_variable(id).await,
            RemoteEntity::Flow(id) => self.remote.delete_flow(id).await,
        }
    }

    /// Bulk read the project and rebuild nodes and edges from scratch. This
    /// is the one point where local and remote state reconcile.
    pub async fn load(&self) -> Result<(Vec<Node>, Vec<Edge>)> {
        let stocks = self.remote.fetch_stocks(self.project_id).await?;
        let variables = self.remote.fetch_variables(self.project_id).await?;
        let flows = self.remote.fetch_flows().await?;

        let stock_ids: std::collections::HashSet<RemoteId> =
            stocks.iter().map(|s| s.id).collect();

        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        for s in stocks {
            let name = if s.name.is_empty() { format!("Stock {}", s.id) } else { s.name };
            nodes.push(Node {
                id: NodeId::Stock(s.id),
                position: Position::default(),
                selected: false,
                data: NodeData::Stock { name, initial_value: s.initial_value },
            });
        }
        for v in variables {
            let name = if v.name.is_empty() { format!("Variable {}", v.id) } else { v.name };
            nodes.push(Node {
                id: NodeId::Variable(v.id),
                position: Position::default(),
                selected: false,
                data: NodeData::Variable { name, value: v.value },
            });
        }
        // The flow collection is store-wide; keep only flows touching the
        // loaded stock set
        for f in flows {
            let (Some(from), Some(to)) = (f.from_stock, f.to_stock) else {
                warn!("skipping flow {} with missing endpoint", f.id);
                continue;
            };
            if !stock_ids.contains(&from) && !stock_ids.contains(&to) {
                continue;
            }
            let rate_id = NodeId::FlowRate(f.id);
            nodes.push(Node {
                id: rate_id,
                position: Position::default(),
                selected: false,
                data: NodeData::FlowRate {
                    name: format!("Flow Rate {}", f.id),
                    flow_value: f.name,
                },
            });
            edges.push(Edge {
                id: EdgeId::Flow(f.id),
                source: NodeId::Stock(from),
                target: NodeId::Stock(to),
                selected: false,
                data: EdgeData::Flow { rate_node: rate_id },
            });
        }
        Ok((nodes, edges))
    }
}
