//! Platform API Client
//!
//! A JSON client for the serverless execution platform, covering the
//! function CRUD, execute, and metrics endpoints.

use crate::api::FunctionPlatform;
use crate::api::error::ApiError;
use crate::consts::cli_consts::http;
use crate::models::{ExecutionOutcome, Function, FunctionSpec, MetricRecord};
use reqwest::{Client, ClientBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// User-Agent string with console version
const USER_AGENT: &str = concat!("faas-console/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct PlatformClient {
    client: Client,
    base_url: String,
}

impl PlatformClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: ClientBuilder::new()
                .connect_timeout(http::connect_timeout())
                .timeout(http::request_timeout())
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Endpoint for the metrics listing, filtered when a function id
    /// is given.
    fn metrics_endpoint(func_id: Option<i64>) -> String {
        match func_id {
            None => "metrics/".to_string(),
            Some(id) => format!("metrics/?func_id={}", id),
        }
    }

    fn decode_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
        serde_json::from_slice(bytes).map_err(ApiError::Json)
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Self::decode_response(&response_bytes)
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .post(&url)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .json(body)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Self::decode_response(&response_bytes)
    }

    async fn put_json_no_response<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .put(&url)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .json(body)
            .send()
            .await?;

        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn delete_no_response(&self, endpoint: &str) -> Result<(), ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .delete(&url)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .send()
            .await?;

        Self::handle_response_status(response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FunctionPlatform for PlatformClient {
    async fn create_function(&self, spec: &FunctionSpec) -> Result<Function, ApiError> {
        self.post_json("functions/", spec).await
    }

    async fn list_functions(&self) -> Result<Vec<Function>, ApiError> {
        self.get_json("functions/").await
    }

    async fn get_function(&self, id: i64) -> Result<Function, ApiError> {
        self.get_json(&format!("functions/{}", id)).await
    }

    async fn update_function(&self, id: i64, spec: &FunctionSpec) -> Result<(), ApiError> {
        self.put_json_no_response(&format!("functions/{}", id), spec)
            .await
    }

    async fn delete_function(&self, id: i64) -> Result<(), ApiError> {
        self.delete_no_response(&format!("functions/{}", id)).await
    }

    async fn execute_function(
        &self,
        id: i64,
        payload: &serde_json::Value,
    ) -> Result<ExecutionOutcome, ApiError> {
        // Executions may legitimately run up to the platform's own
        // limit, so this request gets a wider timeout than the rest.
        let url = self.build_url(&format!("execute/{}", id));
        let response = self
            .client
            .post(&url)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .timeout(http::execute_timeout())
            .json(payload)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Self::decode_response(&response_bytes)
    }

    async fn get_metrics(&self, func_id: Option<i64>) -> Result<Vec<MetricRecord>, ApiError> {
        self.get_json(&Self::metrics_endpoint(func_id)).await
    }
}

#[cfg(test)]
/// These are ignored by default since they require a live platform to run.
mod live_platform_tests {
    use super::*;
    use crate::api::FunctionPlatform;
    use crate::models::Language;

    fn local_client() -> PlatformClient {
        PlatformClient::new("http://localhost:8000")
    }

    #[tokio::test]
    #[ignore] // This test requires a live platform instance.
    /// Should deploy a function and get back an assigned id.
    async fn test_create_function() {
        let client = local_client();
        let spec = FunctionSpec {
            name: "smoke".to_string(),
            language: Language::Python,
            code: "def handler(e): return e".to_string(),
            timeout: 10,
        };
        match client.create_function(&spec).await {
            Ok(func) => println!("Deployed function: {}", func.id),
            Err(e) => panic!("Failed to deploy function: {}", e),
        }
    }

    #[tokio::test]
    #[ignore] // This test requires a live platform instance.
    /// Should list the deployed functions.
    async fn test_list_functions() {
        let client = local_client();
        match client.list_functions().await {
            Ok(funcs) => println!("Got {} functions", funcs.len()),
            Err(e) => panic!("Failed to list functions: {}", e),
        }
    }

    #[tokio::test]
    #[ignore] // This test requires a live platform instance.
    /// Should fetch the unfiltered metrics listing.
    async fn test_get_metrics() {
        let client = local_client();
        match client.get_metrics(None).await {
            Ok(records) => println!("Got {} metric records", records.len()),
            Err(e) => panic!("Failed to fetch metrics: {}", e),
        }
    }
}
