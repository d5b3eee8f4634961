mod support;

use std::sync::Arc;

use schooldesk_client::{FetchController, FetchDeps, FetchOutcome, NotificationLevel, ToastQueue};
use schooldesk_core::grid::{GridRequest, RequestMode};
use schooldesk_model::prelude::*;
use serde_json::{Value, json};
use support::{Reply, StubApi};
use tokio::sync::oneshot;

fn deps(page: u32) -> FetchDeps {
    let request = GridRequest::new(PaginationModel::new(page, 10).unwrap());
    FetchDeps::from_request(Some("students/search".into()), RequestMode::PostJson, request)
}

fn setup() -> (Arc<StubApi>, Arc<ToastQueue>, FetchController) {
    let api = Arc::new(StubApi::new());
    let toasts = Arc::new(ToastQueue::new());
    let controller = FetchController::new(api.clone(), toasts.clone());
    (api, toasts, controller)
}

#[tokio::test]
async fn loose_pagination_defaults_in_payload() {
    let (api, _, controller) = setup();
    let loose = LoosePagination {
        page: Some(json!("two")),
        page_size: None,
    };
    let filters = FilterSet::new().with(filter_keys::SCHOOL_ID, 4);

    let outcome = controller
        .sync(FetchDeps::new(Some("students/search".into()), &loose, filters))
        .await;
    assert!(outcome.is_loaded());

    let sent = serde_json::to_value(&api.page_requests()[0]).unwrap();
    assert_eq!(
        sent,
        json!({"page": 0, "size": 10, "sortBy": "id", "sortDir": "asc", "search": "", "schoolId": 4})
    );
}

#[tokio::test]
async fn one_request_per_dependency_change() {
    let (api, _, controller) = setup();

    assert!(controller.sync(deps(0)).await.is_loaded());
    assert!(matches!(controller.sync(deps(0)).await, FetchOutcome::Unchanged));
    assert!(controller.sync(deps(1)).await.is_loaded());
    assert_eq!(api.page_requests().len(), 2);

    assert!(controller.refetch().await.is_loaded());
    assert_eq!(api.page_requests().len(), 3);
    assert_eq!(api.page_requests()[2].page, 1);
}

#[tokio::test]
async fn missing_url_clears_without_request() {
    let (api, _, controller) = setup();
    api.reply(Reply::Ok(json!([{"id": 1}])));
    controller.sync(deps(0)).await;
    assert!(controller.data().is_some());

    let blank = FetchDeps::from_request(Some("  ".into()), RequestMode::PostJson, deps(0).request);
    assert!(matches!(controller.sync(blank).await, FetchOutcome::Skipped));
    let none = FetchDeps::from_request(None, RequestMode::PostJson, deps(0).request);
    assert!(matches!(controller.sync(none).await, FetchOutcome::Skipped));

    assert!(controller.data().is_none());
    assert!(!controller.loading());
    assert_eq!(api.page_requests().len(), 1);
}

#[tokio::test]
async fn failure_clears_data_and_toasts() {
    let (api, toasts, controller) = setup();
    api.reply(Reply::Ok(json!([{"id": 1}])));
    api.reply(Reply::Fail(500));

    controller.sync(deps(0)).await;
    let outcome = controller.sync(deps(1)).await;

    assert_eq!(outcome.error().and_then(|e| e.status()), Some(500));
    assert!(controller.data().is_none());
    assert!(!controller.loading());
    let toasts = toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn stale_response_never_replaces_newer_data() {
    let (api, _, controller) = setup();
    let (started_tx, started_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    api.reply(Reply::Gated {
        started: started_tx,
        release: release_rx,
    });
    api.reply(Reply::Ok(json!([{"id": "fresh"}])));

    let slow = controller.sync(deps(0));
    let fast = async {
        started_rx.await.unwrap();
        let outcome = controller.sync(deps(1)).await;
        release_tx.send(json!([{"id": "stale"}])).unwrap();
        outcome
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert!(matches!(slow, FetchOutcome::Stale));
    assert!(fast.is_loaded());
    assert_eq!(controller.data(), Some(json!([{"id": "fresh"}])));
    assert!(!controller.loading());
}

#[tokio::test]
async fn close_drops_in_flight_response() {
    let (api, _, controller) = setup();
    let (started_tx, started_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel::<Value>();
    api.reply(Reply::Gated {
        started: started_tx,
        release: release_rx,
    });

    let pending = controller.sync(deps(0));
    let unmount = async {
        started_rx.await.unwrap();
        assert!(controller.loading());
        controller.close();
        release_tx.send(json!([{"id": 1}])).unwrap();
    };
    let (outcome, ()) = tokio::join!(pending, unmount);

    assert!(matches!(outcome, FetchOutcome::Stale));
    assert!(controller.data().is_none());
    assert!(!controller.loading());
}
