pub mod http;
pub mod types;

use anyhow::Result;

use crate::graph_utils::ids::RemoteId;
use self::types::{FlowRecord, ProjectRecord, SimStep, StockRecord, VariableRecord};

/// The wire boundary to the persisted domain store. Everything the client
/// sends over the network goes through one implementation of this trait;
/// tests substitute an in-memory recording one.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    // Bulk reads, used on project load (the only reconciliation point)
    async fn fetch_stocks(&self, project_id: RemoteId) -> Result<Vec<StockRecord>>;
    async fn fetch_variables(&self, project_id: RemoteId) -> Result<Vec<VariableRecord>>;
    async fn fetch_flows(&self) -> Result<Vec<FlowRecord>>;

    async fn create_stock(&self, project_id: RemoteId) -> Result<StockRecord>;
    async fn create_variable(
        &self,
        name: &str,
        value: &str,
        project_id: RemoteId,
    ) -> Result<VariableRecord>;
    async fn create_flow(
        &self,
        name: &str,
        from_stock: RemoteId,
        to_stock: RemoteId,
    ) -> Result<FlowRecord>;

    // Full-record updates; the contract has no partial update
    async fn update_stock(&self, id: RemoteId, name: &str, initial_value: &str) -> Result<()>;
    async fn update_variable(&self, id: RemoteId, name: &str, value: &str) -> Result<()>;
    async fn update_flow(&self, id: RemoteId, name: &str) -> Result<()>;

    async fn delete_stock(&self, id: RemoteId) -> Result<()>;
    async fn delete_variable(&self, id: RemoteId) -> Result<()>;
    async fn delete_flow(&self, id: RemoteId) -> Result<()>;

    async fn simulate(&self, project_id: RemoteId, sim_step: u32) -> Result<Vec<SimStep>>;

    // Project listing boundary (no project screen here, contract only)
    async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>>;
    async fn create_project(&self, name: &str) -> Result<ProjectRecord>;
}
