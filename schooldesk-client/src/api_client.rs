use std::sync::Arc;

use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use schooldesk_core::grid::{GridRequest, RequestMode};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::notify::{Notification, Notifier};
use crate::session::{InvalidationReason, SessionContext};

pub const CREATED_BY: &str = "createdBy";
pub const UPDATED_BY: &str = "updatedBy";
const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

/// Authenticated JSON client for the school backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.session.is_signed_in())
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
    ) -> ApiResult<Self> {
        let base_url = normalize_base_url(&config.base_url);
        reqwest::Url::parse(&base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{base_url}: {err}")))?;

        let client = Client::builder().timeout(config.timeout()).build()?;
        info!("[ApiClient] Using base URL {}", base_url);

        Ok(Self {
            client,
            base_url,
            session,
            notifier,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Resolve `path` against the base URL; absolute URLs pass through.
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let path = path.as_ref();
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer token when a session is active.
    pub fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.access_token() {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.build_url(path);
        debug!("[ApiClient] {} {}", method, url);
        self.build_request(self.client.request(method, url))
    }

    /// Send, then map the status. Empty and 204 bodies come back as `Null`.
    async fn execute(&self, request: RequestBuilder) -> ApiResult<Value> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("[ApiClient] 401 from {}", response.url());
            self.session.invalidate(InvalidationReason::Unauthorized);
            self.notifier.notify(Notification::warning(SESSION_EXPIRED));
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        if status == StatusCode::NO_CONTENT
            || body.iter().all(u8::is_ascii_whitespace)
        {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.execute(self.request(Method::GET, path)).await
    }

    /// `POST` a new record, stamped with `createdBy`.
    pub async fn post(&self, path: &str, mut body: Value) -> ApiResult<Value> {
        self.stamp(&mut body, CREATED_BY);
        self.execute(self.request(Method::POST, path).json(&body)).await
    }

    /// `PUT` a record, stamped with `updatedBy`.
    pub async fn put(&self, path: &str, mut body: Value) -> ApiResult<Value> {
        self.stamp(&mut body, UPDATED_BY);
        self.execute(self.request(Method::PUT, path).json(&body)).await
    }

    /// `PATCH` a record, stamped with `updatedBy`.
    pub async fn patch(&self, path: &str, mut body: Value) -> ApiResult<Value> {
        self.stamp(&mut body, UPDATED_BY);
        self.execute(self.request(Method::PATCH, path).json(&body)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.execute(self.request(Method::DELETE, path)).await
    }

    /// One grid page, sent the way the screen's endpoint expects it.
    pub async fn list(
        &self,
        path: &str,
        mode: RequestMode,
        payload: &GridRequest,
    ) -> ApiResult<Value> {
        let request = match mode {
            RequestMode::PostJson => self.request(Method::POST, path).json(payload),
            RequestMode::GetQuery => {
                self.request(Method::GET, path).query(&payload.query_pairs())
            }
            RequestMode::GetWithBody => self.request(Method::GET, path).json(payload),
        };
        self.execute(request).await
    }

    /// Record the acting user on JSON object bodies.
    fn stamp(&self, body: &mut Value, key: &str) {
        let Some(profile) = self.session.profile() else {
            return;
        };
        if let Value::Object(map) = body {
            map.insert(key.to_string(), Value::from(profile.user_id));
        }
    }
}

/// Add a scheme when missing and drop trailing slashes.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    if normalized != raw {
        debug!("[ApiClient] Normalized base URL '{}' to '{}'", raw, normalized);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastQueue;

    fn client(base_url: &str) -> ApiClient {
        let config = ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        };
        ApiClient::new(&config, SessionContext::new(), Arc::new(ToastQueue::new())).unwrap()
    }

    #[test]
    fn base_url_gets_scheme_and_loses_slash() {
        assert_eq!(client("localhost:8080/api/").base_url(), "http://localhost:8080/api");
        assert_eq!(client("https://school.example").base_url(), "https://school.example");
    }

    #[test]
    fn build_url_joins_relative_paths() {
        let api = client("http://host/api");
        assert_eq!(api.build_url("/students/search"), "http://host/api/students/search");
        assert_eq!(api.build_url("schools/all"), "http://host/api/schools/all");
        assert_eq!(api.build_url("https://cdn.example/x"), "https://cdn.example/x");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ClientConfig {
            base_url: "http://exa mple".to_string(),
            ..ClientConfig::default()
        };
        let err = ApiClient::new(&config, SessionContext::new(), Arc::new(ToastQueue::new()))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
