//! Dependency-driven fetching
//!
//! A [`FetchController`] issues one request each time its dependencies
//! `(url, mode, payload)` change, exposes the decoded body and a loading flag,
//! and can be asked to refetch. Every request is tagged with a generation; a
//! response that comes back after a newer request was started (or after the
//! controller was closed) is dropped without touching state.

use std::sync::Arc;

use parking_lot::Mutex;
use schooldesk_core::grid::{GridRequest, RequestMode};
use schooldesk_model::{FilterSet, LoosePagination};
use serde_json::Value;

use crate::error::ApiError;
use crate::notify::{Notification, Notifier};
use crate::services::ApiService;

pub const LOAD_FAILED: &str = "Failed to load data";

/// Everything a fetch depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchDeps {
    /// `None` or blank means "nothing to load".
    pub url: Option<String>,
    pub mode: RequestMode,
    pub request: GridRequest,
}

impl FetchDeps {
    /// Base payload from loose pagination plus filters, sent as a JSON body.
    pub fn new(
        url: Option<String>,
        pagination: &LoosePagination,
        filters: FilterSet,
    ) -> Self {
        let request = GridRequest::new(pagination.normalize()).with_filters(filters);
        Self::from_request(url, RequestMode::default(), request)
    }

    pub fn from_request(
        url: Option<String>,
        mode: RequestMode,
        request: GridRequest,
    ) -> Self {
        Self { url, mode, request }
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Structural identity used to detect dependency changes.
    fn key(&self) -> Option<String> {
        serde_json::to_string(&(&self.url, self.mode, &self.request)).ok()
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// The response was stored.
    Loaded,
    /// No URL; data was cleared and nothing was sent.
    Skipped,
    /// Dependencies did not change; nothing was sent.
    Unchanged,
    /// A newer request superseded this one; its response was dropped.
    Stale,
    /// The request failed; data was cleared and a toast was raised.
    Failed(ApiError),
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded)
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            FetchOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct FetchState {
    data: Option<Value>,
    loading: bool,
    generation: u64,
    last_key: Option<String>,
    last_deps: Option<FetchDeps>,
}

#[derive(Debug)]
pub struct FetchController {
    api: Arc<dyn ApiService>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<FetchState>,
}

impl FetchController {
    pub fn new(api: Arc<dyn ApiService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(FetchState::default()),
        }
    }

    /// Fetch if `deps` differ from the last ones seen.
    pub async fn sync(&self, deps: FetchDeps) -> FetchOutcome {
        {
            let mut state = self.state.lock();
            let key = deps.key();
            if key.is_some() && state.last_key == key {
                return FetchOutcome::Unchanged;
            }
            state.last_key = key;
            state.last_deps = Some(deps.clone());
        }
        self.run(deps).await
    }

    /// Re-issue the last request regardless of dependency changes.
    pub async fn refetch(&self) -> FetchOutcome {
        let deps = self.state.lock().last_deps.clone();
        match deps {
            Some(deps) => self.run(deps).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Unmount: drop whatever is still in flight.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.loading = false;
    }

    pub fn data(&self) -> Option<Value> {
        self.state.lock().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Whether a request has been issued since mount.
    pub fn has_deps(&self) -> bool {
        self.state.lock().last_deps.is_some()
    }

    async fn run(&self, deps: FetchDeps) -> FetchOutcome {
        let url = deps.url().map(str::to_owned);
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.loading = url.is_some();
            if url.is_none() {
                state.data = None;
            }
            state.generation
        };

        let Some(url) = url else {
            return FetchOutcome::Skipped;
        };
        let result = self.api.fetch_page(&url, deps.mode, &deps.request).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            log::debug!(
                "[Fetch] Dropping response for {} (generation {} < {})",
                url,
                generation,
                state.generation
            );
            return FetchOutcome::Stale;
        }
        state.loading = false;

        match result {
            Ok(body) => {
                state.data = Some(body);
                FetchOutcome::Loaded
            }
            Err(err) => {
                state.data = None;
                drop(state);
                log::warn!("[Fetch] {} failed: {}", url, err);
                self.notifier.notify(Notification::error(LOAD_FAILED));
                FetchOutcome::Failed(err)
            }
        }
    }
}
