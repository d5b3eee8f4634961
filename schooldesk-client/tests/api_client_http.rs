use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use schooldesk_client::{
    ApiClient, ApiError, ApiService, ClientConfig, InvalidationReason, NotificationLevel, Session,
    SessionContext, SessionEvent, ToastQueue, UpdateMethod,
};
use schooldesk_core::grid::{GridRequest, RequestMode};
use schooldesk_model::prelude::*;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct Hit {
    method: Method,
    path: String,
    query: Option<String>,
    auth: Option<String>,
    body: Option<Value>,
}

type Hits = Arc<Mutex<Vec<Hit>>>;

async fn backend(
    State(hits): State<Hits>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    hits.lock().push(Hit {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        auth: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    match (method, uri.path()) {
        (_, "/api/expired") => StatusCode::UNAUTHORIZED.into_response(),
        (Method::DELETE, _) => StatusCode::NO_CONTENT.into_response(),
        (_, "/api/students/search") => {
            axum::Json(json!({"content": [{"id": 1}, {"id": 2}], "totalElements": 42}))
                .into_response()
        }
        (Method::GET, "/api/attendance") => axum::Json(json!([{"id": 7}])).into_response(),
        (Method::GET, "/api/documents/search") => {
            axum::Json(json!({"content": [{"id": 3}], "totalElements": 1})).into_response()
        }
        (Method::POST | Method::PUT | Method::PATCH, _) => {
            axum::Json(body.unwrap_or(Value::Null)).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_backend() -> (String, Hits) {
    let hits: Hits = Arc::default();
    let app = Router::new().fallback(backend).with_state(hits.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api/"), hits)
}

struct Fixture {
    api: ApiClient,
    session: SessionContext,
    toasts: Arc<ToastQueue>,
    hits: Hits,
}

async fn fixture(signed_in: bool) -> Fixture {
    let (base_url, hits) = spawn_backend().await;
    let session = SessionContext::new();
    if signed_in {
        let profile = Profile::new(AccountId(9), 90, ActorKind::Admin);
        session.sign_in(Session::new("secret-token", profile)).unwrap();
    }
    let toasts = Arc::new(ToastQueue::new());
    let config = ClientConfig {
        base_url,
        ..ClientConfig::default()
    };
    let api = ApiClient::new(&config, session.clone(), toasts.clone()).unwrap();
    Fixture {
        api,
        session,
        toasts,
        hits,
    }
}

fn last_hit(hits: &Hits) -> Hit {
    hits.lock().last().cloned().unwrap()
}

#[tokio::test]
async fn post_list_carries_bearer_and_payload() {
    let f = fixture(true).await;
    let request = GridRequest::new(PaginationModel::default())
        .with_filters(FilterSet::new().with(filter_keys::SCHOOL_ID, 1));

    let body = f
        .api
        .fetch_page("students/search", RequestMode::PostJson, &request)
        .await
        .unwrap();

    assert_eq!(body["totalElements"], json!(42));
    let hit = last_hit(&f.hits);
    assert_eq!(hit.method, Method::POST);
    assert_eq!(hit.auth.as_deref(), Some("Bearer secret-token"));
    assert_eq!(hit.body.unwrap()["schoolId"], json!(1));
}

#[tokio::test]
async fn get_query_repeats_list_keys() {
    let f = fixture(true).await;
    let request = GridRequest::new(PaginationModel::default())
        .with_filters(FilterSet::new().with(filter_keys::CLASS_LIST, json!([4, 5])));

    let body = f
        .api
        .fetch_page("attendance", RequestMode::GetQuery, &request)
        .await
        .unwrap();

    assert_eq!(body, json!([{"id": 7}]));
    let hit = last_hit(&f.hits);
    assert_eq!(hit.method, Method::GET);
    let query = hit.query.unwrap();
    assert!(query.contains("sortBy=id"), "{query}");
    assert!(query.contains("classList=4&classList=5"), "{query}");
}

#[tokio::test]
async fn get_with_body_sends_json_payload() {
    let f = fixture(true).await;
    let request = GridRequest::new(PaginationModel::new(1, 20).unwrap())
        .with_filters(FilterSet::new().with(filter_keys::SCHOOL_ID, 1));

    let body = f
        .api
        .fetch_page("documents/search", RequestMode::GetWithBody, &request)
        .await
        .unwrap();

    assert_eq!(body["totalElements"], json!(1));
    let hit = last_hit(&f.hits);
    assert_eq!(hit.method, Method::GET);
    assert_eq!(hit.path, "/api/documents/search");
    assert_eq!(hit.query, None);
    let sent = hit.body.unwrap();
    assert_eq!(sent["page"], json!(1));
    assert_eq!(sent["size"], json!(20));
    assert_eq!(sent["schoolId"], json!(1));
}

#[tokio::test]
async fn delete_hits_scoped_path_and_accepts_no_content() {
    let f = fixture(true).await;
    ApiService::delete(&f.api, "students/9/5").await.unwrap();

    let hit = last_hit(&f.hits);
    assert_eq!(hit.method, Method::DELETE);
    assert_eq!(hit.path, "/api/students/9/5");
}

#[tokio::test]
async fn writes_are_stamped_with_acting_user() {
    let f = fixture(true).await;

    let created = f.api.create("students", json!({"firstName": "Asha"})).await.unwrap();
    assert_eq!(created["createdBy"], json!(90));
    assert!(created.get("updatedBy").is_none());

    let updated = f
        .api
        .update("students/3", json!({"firstName": "Asha"}), UpdateMethod::Patch)
        .await
        .unwrap();
    assert_eq!(updated["updatedBy"], json!(90));
    assert_eq!(last_hit(&f.hits).method, Method::PATCH);

    let list = f.api.create("students/bulk", json!([1, 2])).await.unwrap();
    assert_eq!(list, json!([1, 2]));
}

#[tokio::test]
async fn unauthorized_invalidates_session_and_warns() {
    let f = fixture(true).await;
    let events = f.session.subscribe();

    let err = f.api.get_json("expired").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert!(!f.session.is_signed_in());
    assert_eq!(
        *events.borrow(),
        SessionEvent::Invalidated(InvalidationReason::Unauthorized)
    );
    let toasts = f.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, NotificationLevel::Warning);
}

#[tokio::test]
async fn other_statuses_are_reported() {
    let f = fixture(true).await;
    let err = f.api.get_json("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(f.session.is_signed_in());
}

#[tokio::test]
async fn anonymous_requests_have_no_bearer() {
    let f = fixture(false).await;
    let request = GridRequest::new(PaginationModel::default());
    f.api
        .fetch_page("students/search", RequestMode::PostJson, &request)
        .await
        .unwrap();
    assert!(last_hit(&f.hits).auth.is_none());
}
