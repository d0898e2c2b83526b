use crate::api::error::ApiError;
use crate::models::{ExecutionOutcome, Function, FunctionSpec, MetricRecord};

pub(crate) mod client;
pub use client::PlatformClient;
pub mod error;

#[cfg(test)]
use mockall::{automock, predicate::*};

/// The four endpoint families of the execution platform, one method
/// per user-visible operation. Everything behind this trait is remote;
/// the console holds no durable state of its own.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait FunctionPlatform: Send + Sync {
    /// Deploy a new function. The platform assigns the id.
    async fn create_function(&self, spec: &FunctionSpec) -> Result<Function, ApiError>;

    /// Fetch every deployed function.
    async fn list_functions(&self) -> Result<Vec<Function>, ApiError>;

    /// Fetch a single function by id.
    async fn get_function(&self, id: i64) -> Result<Function, ApiError>;

    /// Full replace of a function's stored fields.
    async fn update_function(&self, id: i64, spec: &FunctionSpec) -> Result<(), ApiError>;

    /// Remove a function.
    async fn delete_function(&self, id: i64) -> Result<(), ApiError>;

    /// Run a function with an arbitrary JSON payload.
    async fn execute_function(
        &self,
        id: i64,
        payload: &serde_json::Value,
    ) -> Result<ExecutionOutcome, ApiError>;

    /// Fetch execution metrics, optionally filtered to one function.
    async fn get_metrics(&self, func_id: Option<i64>) -> Result<Vec<MetricRecord>, ApiError>;
}
