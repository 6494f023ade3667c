use anyhow::Result;
use log::{error, warn};

use super::cascade;
use super::selection::Selection;
use super::sync::RemoteSync;
use crate::graph_utils::connect::{ConnectionMode, is_valid_connection};
use crate::graph_utils::graph::{DiagramGraph, Edge, EdgeData, Node, NodeData, Position};
use crate::graph_utils::ids::{EdgeId, NodeId, RemoteId};
use crate::remote::RemoteStore;
use crate::sim::bridge::{self, SimDataset};

/// The property-panel field an edit targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PropertyField {
    Name,
    InitialValue,
    Value,
    FlowValue,
}

/// Gesture entry point for the diagram editor. Every user action lands here,
/// mutates the graph optimistically, and mirrors itself to the store through
/// `RemoteSync`. Remote failures on edits and deletes are logged and dropped;
/// the local state is never rolled back.
pub struct DiagramEditor<R: RemoteStore> {
    graph: DiagramGraph,
    sync: RemoteSync<R>,
    selection: Selection,
    mode: ConnectionMode,
    // Link edges are never persisted, so a local counter numbers them
    link_seq: u64,
    variable_seq: u64,
}

impl<R: RemoteStore> DiagramEditor<R> {
    pub fn new(remote: R, project_id: RemoteId) -> Self {
        DiagramEditor {
            graph: DiagramGraph::new(),
            sync: RemoteSync::new(remote, project_id),
            selection: Selection::new(),
            mode: ConnectionMode::Flow,
            link_seq: 0,
            variable_seq: 0,
        }
    }

    pub fn graph(&self) -> &DiagramGraph {
        &self.graph
    }

    pub fn remote(&self) -> &R {
        self.sync.remote()
    }

    pub fn project_id(&self) -> RemoteId {
        self.sync.project_id()
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ConnectionMode) {
        self.mode = mode;
    }

    /// Rebuild the whole graph from the store. This is the only point where
    /// local divergence from the remote store gets reconciled.
    pub async fn load(&mut self) -> Result<()> {
        let (nodes, edges) = self.sync.load().await?;
        self.graph.clear();
        self.selection.clear();
        for node in nodes {
            self.graph.insert_node(node);
        }
        for edge in edges {
            self.graph.insert_edge(edge);
        }
        Ok(())
    }

    /// Drop gesture for a stock. The node is inserted only once the store has
    /// issued its id; on failure nothing changes locally.
    pub async fn drop_stock(&mut self, position: Position) -> Option<NodeId> {
        match self.sync.create_stock(position).await {
            Ok(node) => {
                let id = node.id;
                if !self.graph.insert_node(node) {
                    warn!("store issued duplicate stock id {}", id);
                    return None;
                }
                Some(id)
            }
            Err(e) => {
                error!("create stock failed: {:#}", e);
                None
            }
        }
    }

    pub async fn drop_variable(&mut self, position: Position) -> Option<NodeId> {
        self.variable_seq += 1;
        let draft = format!("Variable {}", self.variable_seq);
        match self.sync.create_variable(&draft, position).await {
            Ok(node) => {
                let id = node.id;
                if !self.graph.insert_node(node) {
                    warn!("store issued duplicate variable id {}", id);
                    return None;
                }
                Some(id)
            }
            Err(e) => {
                error!("create variable failed: {:#}", e);
                None
            }
        }
    }

    /// Connect gesture in the current mode. Invalid pairs are rejected before
    /// any remote call. Flow mode creates the edge and its rate node from one
    /// store-issued id; link mode is local-only.
    pub async fn connect(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        if !is_valid_connection(&self.graph, source, target, self.mode) {
            return None;
        }
        match self.mode {
            ConnectionMode::Flow => {
                let source_pos = self.graph.get_node(source)?.position;
                let target_pos = self.graph.get_node(target)?.position;
                match self.sync.create_flow(source, target, source_pos, target_pos).await {
                    Ok((edge, rate_node)) => {
                        let edge_id = edge.id;
                        self.graph.insert_node(rate_node);
                        self.graph.insert_edge(edge);
                        Some(edge_id)
                    }
                    Err(e) => {
                        error!("create flow failed: {:#}", e);
                        None
                    }
                }
            }
            ConnectionMode::Link => {
                self.link_seq += 1;
                let edge = Edge {
                    id: EdgeId::Link(self.link_seq),
                    source,
                    target,
                    selected: false,
                    data: EdgeData::Link,
                };
                let id = edge.id;
                self.graph.insert_edge(edge);
                Some(id)
            }
        }
    }

    pub fn focus_node(&mut self, id: NodeId) -> bool {
        if let Some(node) = self.graph.get_node(id) {
            self.selection.focus(node.clone());
            true
        } else {
            false
        }
    }

    // Empty-canvas click
    pub fn click_background(&mut self) {
        self.selection.clear();
    }

    pub fn focused(&self) -> Option<&Node> {
        self.selection.focused()
    }

    pub fn set_node_selected(&mut self, id: NodeId, selected: bool) -> bool {
        self.graph.set_node_selected(id, selected)
    }

    pub fn set_edge_selected(&mut self, id: EdgeId, selected: bool) -> bool {
        self.graph.set_edge_selected(id, selected)
    }

    pub fn move_node(&mut self, id: NodeId, position: Position) -> bool {
        self.graph.set_node_position(id, position)
    }

    /// Property-panel edit: patch graph and focus snapshot immediately, then
    /// fire the full-record update. Every keystroke gets its own call; there
    /// is no debouncing and the response is not awaited into any rollback.
    pub async fn edit_property(&mut self, id: NodeId, field: PropertyField, value: &str) {
        let Some(data) = self.graph.node_data_mut(id) else {
            warn!("edit for unknown node {}", id);
            return;
        };
        if !apply_field(data, field, value) {
            warn!("field {:?} does not apply to {}", field, id);
            return;
        }
        self.selection.patch(id, |node| {
            apply_field(&mut node.data, field, value);
        });

        if let Err(e) = self.sync.update_from_graph(&self.graph, id).await {
            warn!("remote update for {} failed, keeping local edit: {:#}", id, e);
        }
    }

    /// Delete gesture: resolve flow ↔ rate-node pairs across the current
    /// selection, issue one remote delete per distinct record, then drop the
    /// local entities and clear the selection.
    pub async fn delete_selected(&mut self) {
        let selected_nodes = self.graph.selected_nodes();
        let selected_edges = self.graph.selected_edges();
        let plan = cascade::plan_removal(&self.graph, &selected_nodes, &selected_edges);
        if plan.is_empty() {
            return;
        }

        for entity in &plan.remote {
            if let Err(e) = self.sync.delete_entity(*entity).await {
                warn!("remote delete of {:?} failed, removing locally anyway: {:#}", entity, e);
            }
        }

        self.graph.retain_nodes(|id| !plan.nodes.contains(&id));
        self.graph.retain_edges(|id| !plan.edges.contains(&id));
        self.graph.clear_selection();
        self.selection.clear();
    }

    // Reset gesture: local wipe only, the store keeps its records
    pub fn reset(&mut self) {
        self.graph.clear();
        self.selection.clear();
    }

    /// Run the remote simulation for this diagram's project. Reads only the
    /// project id, never the local graph.
    pub async fn simulate(&self, steps: u32) -> Result<SimDataset> {
        bridge::run_simulation(self.sync.remote(), self.sync.project_id(), steps).await
    }
}

fn apply_field(data: &mut NodeData, field: PropertyField, value: &str) -> bool {
    match (data, field) {
        (NodeData::Stock { name, .. }, PropertyField::Name)
        | (NodeData::Variable { name, .. }, PropertyField::Name)
        | (NodeData::FlowRate { name, .. }, PropertyField::Name) => {
            *name = value.to_string();
            true
        }
        (NodeData::Stock { initial_value, .. }, PropertyField::InitialValue) => {
            *initial_value = value.to_string();
            true
        }
        (NodeData::Variable { value: v, .. }, PropertyField::Value) => {
            *v = value.to_string();
            true
        }
        (NodeData::FlowRate { flow_value, .. }, PropertyField::FlowValue) => {
            *flow_value = value.to_string();
            true
        }
        _ => false,
    }
}
