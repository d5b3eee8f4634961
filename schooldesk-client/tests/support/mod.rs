#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use schooldesk_client::{ApiError, ApiResult, ApiService, UpdateMethod};
use schooldesk_core::grid::{GridRequest, RequestMode};
use schooldesk_model::prelude::*;
use serde_json::{Value, json};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Page {
        path: String,
        mode: RequestMode,
        request: GridRequest,
    },
    Get(String),
    Create(String, Value),
    Update(String, Value, UpdateMethod),
    Delete(String),
}

#[derive(Debug)]
pub enum Reply {
    Ok(Value),
    Fail(u16),
    /// Signal `started`, then wait for the body on `release`.
    Gated {
        started: oneshot::Sender<()>,
        release: oneshot::Receiver<Value>,
    },
}

/// Scripted [`ApiService`] that records every call.
#[derive(Debug, Default)]
pub struct StubApi {
    calls: Mutex<Vec<Call>>,
    pages: Mutex<VecDeque<Reply>>,
    lookups: Mutex<HashMap<String, Value>>,
    delete_failure: Mutex<Option<u16>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, reply: Reply) -> &Self {
        self.pages.lock().push_back(reply);
        self
    }

    pub fn lookup(&self, path: &str, body: Value) -> &Self {
        self.lookups.lock().insert(path.to_string(), body);
        self
    }

    pub fn fail_deletes(&self, status: u16) {
        *self.delete_failure.lock() = Some(status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn page_requests(&self) -> Vec<GridRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Page { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

fn status(status: u16) -> ApiError {
    ApiError::Status {
        status,
        message: "stubbed failure".to_string(),
    }
}

#[async_trait]
impl ApiService for StubApi {
    async fn fetch_page(
        &self,
        path: &str,
        mode: RequestMode,
        request: &GridRequest,
    ) -> ApiResult<Value> {
        self.record(Call::Page {
            path: path.to_string(),
            mode,
            request: request.clone(),
        });
        let reply = self.pages.lock().pop_front();
        match reply {
            None => Ok(json!([])),
            Some(Reply::Ok(body)) => Ok(body),
            Some(Reply::Fail(code)) => Err(status(code)),
            Some(Reply::Gated { started, release }) => {
                let _ = started.send(());
                release.await.map_err(|_| status(499))
            }
        }
    }

    async fn get_json(&self, path: &str) -> ApiResult<Value> {
        self.record(Call::Get(path.to_string()));
        let body = self.lookups.lock().get(path).cloned();
        body.ok_or_else(|| status(404))
    }

    async fn create(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.record(Call::Create(path.to_string(), body.clone()));
        Ok(body)
    }

    async fn update(
        &self,
        path: &str,
        body: Value,
        method: UpdateMethod,
    ) -> ApiResult<Value> {
        self.record(Call::Update(path.to_string(), body.clone(), method));
        Ok(body)
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.record(Call::Delete(path.to_string()));
        let failure = *self.delete_failure.lock();
        match failure {
            Some(code) => Err(status(code)),
            None => Ok(()),
        }
    }
}

pub fn rows(ids: impl IntoIterator<Item = i64>) -> Vec<Value> {
    ids.into_iter()
        .map(|id| json!({"id": id, "firstName": format!("S{id}"), "lastName": "Rao", "schoolId": 1}))
        .collect()
}

pub fn admin() -> Profile {
    Profile::new(AccountId(9), 90, ActorKind::Admin).with_permissions([
        PermissionEntry::new("STUDENT", [Action::View, Action::Edit, Action::Delete]),
    ])
}

pub fn student() -> Profile {
    Profile::new(AccountId(11), 110, ActorKind::Student).with_scd(Some(1), Some(2), Some(3))
}
