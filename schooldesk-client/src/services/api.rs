//! API service trait and its HTTP implementation
//!
//! The grid, fetch controller and SCD prefetch only see this trait, so tests
//! can drive them with a scripted stub instead of a live backend.

use std::fmt::Debug;

use async_trait::async_trait;
use schooldesk_core::grid::{GridRequest, RequestMode};
use serde_json::Value;

use crate::api_client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMethod {
    #[default]
    Put,
    Patch,
}

/// Backend operations used by the dashboard
#[async_trait]
pub trait ApiService: Send + Sync + Debug {
    /// Fetch one page of a list endpoint.
    async fn fetch_page(
        &self,
        path: &str,
        mode: RequestMode,
        request: &GridRequest,
    ) -> ApiResult<Value>;

    async fn get_json(&self, path: &str) -> ApiResult<Value>;

    /// Create a record; object bodies are stamped with `createdBy`.
    async fn create(&self, path: &str, body: Value) -> ApiResult<Value>;

    /// Update a record; object bodies are stamped with `updatedBy`.
    async fn update(
        &self,
        path: &str,
        body: Value,
        method: UpdateMethod,
    ) -> ApiResult<Value>;

    async fn delete(&self, path: &str) -> ApiResult<()>;
}

#[async_trait]
impl ApiService for ApiClient {
    async fn fetch_page(
        &self,
        path: &str,
        mode: RequestMode,
        request: &GridRequest,
    ) -> ApiResult<Value> {
        self.list(path, mode, request).await
    }

    async fn get_json(&self, path: &str) -> ApiResult<Value> {
        self.get(path).await
    }

    async fn create(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.post(path, body).await
    }

    async fn update(
        &self,
        path: &str,
        body: Value,
        method: UpdateMethod,
    ) -> ApiResult<Value> {
        match method {
            UpdateMethod::Put => self.put(path, body).await,
            UpdateMethod::Patch => self.patch(path, body).await,
        }
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        ApiClient::delete(self, path).await.map(|_| ())
    }
}
