use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph_utils::ids::RemoteId;

/// Every store response wraps its payload in the same envelope. `success`
/// false with a 200 status is the application-level failure case.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockRecord {
    pub id: RemoteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub initial_value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableRecord {
    pub id: RemoteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowRecord {
    pub id: RemoteId,
    #[serde(default)]
    pub name: String,
    // Endpoints are nullable in the store schema
    pub from_stock: Option<RemoteId>,
    pub to_stock: Option<RemoteId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRecord {
    pub id: RemoteId,
    #[serde(default)]
    pub name: String,
}

/// One simulation step: series name to value. The store serializes its step
/// maps with sorted keys, so a sorted map round-trips the wire order.
pub type SimStep = BTreeMap<String, f64>;

// Request bodies

#[derive(Debug, Serialize)]
pub struct CreateStockRequest {
    pub project_id: RemoteId,
}

#[derive(Debug, Serialize)]
pub struct CreateVariableRequest<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub project_id: RemoteId,
}

#[derive(Debug, Serialize)]
pub struct CreateFlowRequest<'a> {
    pub name: &'a str,
    pub from_stock: RemoteId,
    pub to_stock: RemoteId,
}

#[derive(Debug, Serialize)]
pub struct UpdateStockRequest<'a> {
    pub name: &'a str,
    pub initial_value: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateVariableRequest<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateFlowRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SimulateRequest {
    pub project_id: RemoteId,
    pub sim_step: u32,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectRequest<'a> {
    pub name: &'a str,
}
