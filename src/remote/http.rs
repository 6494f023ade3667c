use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::RemoteStore;
use super::types::*;
use crate::graph_utils::ids::RemoteId;

/// reqwest-backed `RemoteStore`. The endpoint is injected here rather than
/// read from a global, so tests and multi-backend setups can pick their own.
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpRemote { base_url, client: reqwest::Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Unwraps the store's {success, message, data} envelope. success=false in
    // a well-formed 200 body is the application-level failure case.
    fn take_data<T>(env: Envelope<T>, what: &str) -> Result<T> {
        if !env.success {
            bail!("{} rejected by store: {}", what, env.message);
        }
        env.data.ok_or_else(|| anyhow!("{}: response missing data", what))
    }

    // List endpoints serialize an empty collection as null; that is an empty
    // result, not a protocol failure.
    fn take_list<T>(env: Envelope<Vec<T>>, what: &str) -> Result<Vec<T>> {
        if !env.success {
            bail!("{} rejected by store: {}", what, env.message);
        }
        Ok(env.data.unwrap_or_default())
    }

    async fn get_envelope<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {}", path))?
            .error_for_status()?;
        Ok(resp.json().await.with_context(|| format!("GET {}: malformed body", path))?)
    }

    async fn post_envelope<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>> {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {}", path))?
            .error_for_status()?;
        Ok(resp.json().await.with_context(|| format!("POST {}: malformed body", path))?)
    }

    // PUT and DELETE carry no data payload worth keeping; only the success
    // flag matters.
    async fn put_ack<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("PUT {}", path))?
            .error_for_status()?;
        let env: Envelope<serde_json::Value> =
            resp.json().await.with_context(|| format!("PUT {}: malformed body", path))?;
        if !env.success {
            bail!("PUT {} rejected by store: {}", path, env.message);
        }
        Ok(())
    }

    async fn delete_ack(&self, path: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .with_context(|| format!("DELETE {}", path))?
            .error_for_status()?;
        let env: Envelope<serde_json::Value> =
            resp.json().await.with_context(|| format!("DELETE {}: malformed body", path))?;
        if !env.success {
            bail!("DELETE {} rejected by store: {}", path, env.message);
        }
        Ok(())
    }
}

impl RemoteStore for HttpRemote {
    async fn fetch_stocks(&self, project_id: RemoteId) -> Result<Vec<StockRecord>> {
        let env = self.get_envelope(&format!("/stocks?project_id={}", project_id)).await?;
        Self::take_list(env, "fetch stocks")
    }

    async fn fetch_variables(&self, project_id: RemoteId) -> Result<Vec<VariableRecord>> {
        let env = self.get_envelope(&format!("/variables?project_id={}", project_id)).await?;
        Self::take_list(env, "fetch variables")
    }

    async fn fetch_flows(&self) -> Result<Vec<FlowRecord>> {
        // The store has no per-project flow filter; callers narrow the result
        // to flows touching their loaded stocks
        let env = self.get_envelope("/flows").await?;
        Self::take_list(env, "fetch flows")
    }

    async fn create_stock(&self, project_id: RemoteId) -> Result<StockRecord> {
        let env = self.post_envelope("/stocks", &CreateStockRequest { project_id }).await?;
        Self::take_data(env, "create stock")
    }

    async fn create_variable(
        &self,
        name: &str,
        value: &str,
        project_id: RemoteId,
    ) -> Result<VariableRecord> {
        let body = CreateVariableRequest { name, value, project_id };
        let env = self.post_envelope("/variables", &body).await?;
        Self::take_data(env, "create variable")
    }

    async fn create_flow(
        &self,
        name: &str,
        from_stock: RemoteId,
        to_stock: RemoteId,
    ) -> Result<FlowRecord> {
        let body = CreateFlowRequest { name, from_stock, to_stock };
        let env = self.post_envelope("/flows", &body).await?;
        Self::take_data(env, "create flow")
    }

    async fn update_stock(&self, id: RemoteId, name: &str, initial_value: &str) -> Result<()> {
        self.put_ack(&format!("/stocks/{}", id), &UpdateStockRequest { name, initial_value })
            .await
    }

    async fn update_variable(&self, id: RemoteId, name: &str, value: &str) -> Result<()> {
        self.put_ack(&format!("/variables/{}", id), &UpdateVariableRequest { name, value })
            .await
    }

    async fn update_flow(&self, id: RemoteId, name: &str) -> Result<()> {
        self.put_ack(&format!("/flows/{}", id), &UpdateFlowRequest { name }).await
    }

    async fn delete_stock(&self, id: RemoteId) -> Result<()> {
        self.delete_ack(&format!("/stocks/{}", id)).await
    }

    async fn delete_variable(&self, id: RemoteId) -> Result<()> {
        self.delete_ack(&format!("/variables/{}", id)).await
    }

    async fn delete_flow(&self, id: RemoteId) -> Result<()> {
        self.delete_ack(&format!("/flows/{}", id)).await
    }

    async fn simulate(&self, project_id: RemoteId, sim_step: u32) -> Result<Vec<SimStep>> {
        let body = SimulateRequest { project_id, sim_step };
        let env = self.post_envelope("/simulate", &body).await?;
        Self::take_list(env, "simulate")
    }

    async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>> {
        let env = self.get_envelope("/projects").await?;
        Self::take_list(env, "fetch projects")
    }

    async fn create_project(&self, name: &str) -> Result<ProjectRecord> {
        let env = self.post_envelope("/projects", &CreateProjectRequest { name }).await?;
        Self::take_data(env, "create project")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_data_in_a_list_body_means_empty_not_error() {
        let env: Envelope<Vec<StockRecord>> =
            serde_json::from_str(r#"{"success":true,"message":"","data":null}"#).unwrap();
        let list = HttpRemote::take_list(env, "fetch stocks").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn absent_data_field_is_tolerated_in_list_bodies() {
        let env: Envelope<Vec<StockRecord>> =
            serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(HttpRemote::take_list(env, "fetch stocks").unwrap().is_empty());
    }

    #[test]
    fn rejected_list_body_surfaces_the_store_message() {
        let env: Envelope<Vec<StockRecord>> = serde_json::from_str(
            r#"{"success":false,"message":"no such project","data":null}"#,
        )
        .unwrap();
        let err = HttpRemote::take_list(env, "fetch stocks").unwrap_err();
        assert!(err.to_string().contains("no such project"));
    }

    #[test]
    fn rejected_create_body_is_an_application_failure() {
        let env: Envelope<StockRecord> = serde_json::from_str(
            r#"{"success":false,"message":"project missing","data":null}"#,
        )
        .unwrap();
        let err = HttpRemote::take_data(env, "create stock").unwrap_err();
        assert!(err.to_string().contains("project missing"));
    }

    #[test]
    fn accepted_create_body_without_data_is_still_an_error() {
        let env: Envelope<StockRecord> =
            serde_json::from_str(r#"{"success":true,"message":"","data":null}"#).unwrap();
        let err = HttpRemote::take_data(env, "create stock").unwrap_err();
        assert!(err.to_string().contains("missing data"));
    }

    #[test]
    fn record_payload_comes_back_through_the_envelope() {
        let env: Envelope<StockRecord> = serde_json::from_str(
            r#"{"success":true,"message":"","data":{"id":4,"name":"water","initial_value":"10"}}"#,
        )
        .unwrap();
        let rec = HttpRemote::take_data(env, "create stock").unwrap();
        assert_eq!(rec.id, 4);
        assert_eq!(rec.name, "water");
        assert_eq!(rec.initial_value, "10");
    }
}
